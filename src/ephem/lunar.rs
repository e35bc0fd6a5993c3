//! Lunar position, illumination and principal phases.
//!
//! Position follows Jean Meeus "Astronomical Algorithms" ch. 47 using the
//! leading periodic terms of Tables 47.A and 47.B (about 0.3° in longitude).
//! Phase instants are solved on the Moon–Sun longitude difference.

use super::solar::{self, obliquity};
use super::sphere::{ecliptic_to_equatorial, normalize_degrees, signed_degrees};

const EARTH_RADIUS_KM: f64 = 6378.14;
const MOON_RADIUS_KM: f64 = 1737.4;
const AU_KM: f64 = 149_597_870.7;

/// Mean daily motion of the Moon relative to the Sun, degrees per day.
const SYNODIC_RATE: f64 = 360.0 / 29.530588853;

/// Geocentric position of the Moon.
#[derive(Debug, Clone, Copy)]
pub struct MoonPosition {
    pub longitude: f64,
    pub latitude: f64,
    pub distance_km: f64,
    pub right_ascension: f64,
    pub declination: f64,
}

impl MoonPosition {
    /// Equatorial horizontal parallax, degrees.
    pub fn parallax(&self) -> f64 {
        (EARTH_RADIUS_KM / self.distance_km).asin().to_degrees()
    }

    /// Geocentric apparent semidiameter, degrees.
    pub fn semidiameter(&self) -> f64 {
        (MOON_RADIUS_KM / self.distance_km).asin().to_degrees()
    }

    /// Lower a geocentric altitude to the topocentric one seen from the surface.
    pub fn topocentric_altitude(&self, geocentric_alt: f64) -> f64 {
        geocentric_alt - self.parallax() * geocentric_alt.to_radians().cos()
    }
}

// Longitude and distance terms (Table 47.A): (D, M, M', F, Σl in 1e-6°, Σr in 1e-3 km)
const TERMS_LR: [(f64, f64, f64, f64, f64, f64); 20] = [
    (0.0, 0.0, 1.0, 0.0, 6288774.0, -20905355.0),
    (2.0, 0.0, -1.0, 0.0, 1274027.0, -3699111.0),
    (2.0, 0.0, 0.0, 0.0, 658314.0, -2955968.0),
    (0.0, 0.0, 2.0, 0.0, 213618.0, -569925.0),
    (0.0, 1.0, 0.0, 0.0, -185116.0, 48888.0),
    (0.0, 0.0, 0.0, 2.0, -114332.0, -3149.0),
    (2.0, 0.0, -2.0, 0.0, 58793.0, 246158.0),
    (2.0, -1.0, -1.0, 0.0, 57066.0, -152138.0),
    (2.0, 0.0, 1.0, 0.0, 53322.0, -170733.0),
    (2.0, -1.0, 0.0, 0.0, 45758.0, -204586.0),
    (0.0, 1.0, -1.0, 0.0, -40923.0, -129620.0),
    (1.0, 0.0, 0.0, 0.0, -34720.0, 108743.0),
    (0.0, 1.0, 1.0, 0.0, -30383.0, 104755.0),
    (2.0, 0.0, 0.0, -2.0, 15327.0, 10321.0),
    (0.0, 0.0, 1.0, 2.0, -12528.0, 0.0),
    (0.0, 0.0, 1.0, -2.0, 10980.0, 79661.0),
    (4.0, 0.0, -1.0, 0.0, 10675.0, -34782.0),
    (0.0, 0.0, 3.0, 0.0, 10034.0, -23210.0),
    (4.0, 0.0, -2.0, 0.0, 8548.0, -21636.0),
    (2.0, 1.0, -1.0, 0.0, -7888.0, 24208.0),
];

// Latitude terms (Table 47.B): (D, M, M', F, Σb in 1e-6°)
const TERMS_B: [(f64, f64, f64, f64, f64); 20] = [
    (0.0, 0.0, 0.0, 1.0, 5128122.0),
    (0.0, 0.0, 1.0, 1.0, 280602.0),
    (0.0, 0.0, 1.0, -1.0, 277693.0),
    (2.0, 0.0, 0.0, -1.0, 173237.0),
    (2.0, 0.0, -1.0, 1.0, 55413.0),
    (2.0, 0.0, -1.0, -1.0, 46271.0),
    (2.0, 0.0, 0.0, 1.0, 32573.0),
    (0.0, 0.0, 2.0, 1.0, 17198.0),
    (2.0, 0.0, 1.0, -1.0, 9266.0),
    (0.0, 0.0, 2.0, -1.0, 8822.0),
    (2.0, -1.0, 0.0, -1.0, 8216.0),
    (2.0, 0.0, -2.0, -1.0, 4324.0),
    (2.0, 0.0, 1.0, 1.0, 4200.0),
    (2.0, 1.0, 0.0, -1.0, -3359.0),
    (2.0, -1.0, -1.0, 1.0, 2463.0),
    (2.0, -1.0, 0.0, 1.0, 2211.0),
    (2.0, -1.0, -1.0, -1.0, 2065.0),
    (0.0, 1.0, -1.0, -1.0, -1870.0),
    (4.0, 0.0, -1.0, -1.0, 1828.0),
    (0.0, 1.0, 0.0, 1.0, -1794.0),
];

/// Fundamental arguments (L', D, M, M', F) in degrees.
fn fundamental_arguments(t: f64) -> (f64, f64, f64, f64, f64) {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let lp = 218.3164477 + 481267.88123421 * t - 0.0015786 * t2 + t3 / 538841.0 - t4 / 65194000.0;
    let d = 297.8501921 + 445267.1114034 * t - 0.0018819 * t2 + t3 / 545868.0 - t4 / 113065000.0;
    let m = 357.5291092 + 35999.0502909 * t - 0.0001536 * t2 + t3 / 24490000.0;
    let mp = 134.9633964 + 477198.8675055 * t + 0.0087414 * t2 + t3 / 69699.0 - t4 / 14712000.0;
    let f = 93.2720950 + 483202.0175233 * t - 0.0036539 * t2 - t3 / 3526000.0 + t4 / 863310000.0;
    (
        normalize_degrees(lp),
        normalize_degrees(d),
        normalize_degrees(m),
        normalize_degrees(mp),
        normalize_degrees(f),
    )
}

/// Ecliptic longitude, latitude (degrees) and distance (km) of the Moon.
fn ecliptic(t: f64) -> (f64, f64, f64) {
    let (lp, d, m, mp, f) = fundamental_arguments(t);

    // Terms involving M shrink with the decreasing eccentricity of Earth's orbit.
    let e = 1.0 - 0.002516 * t - 0.0000074 * t * t;
    let e_factor = |tm: f64| match tm.abs() as i32 {
        1 => e,
        2 => e * e,
        _ => 1.0,
    };

    let (mut sum_l, mut sum_r) = (0.0, 0.0);
    for &(td, tm, tmp, tf, cl, cr) in &TERMS_LR {
        let arg = (td * d + tm * m + tmp * mp + tf * f).to_radians();
        sum_l += cl * e_factor(tm) * arg.sin();
        sum_r += cr * e_factor(tm) * arg.cos();
    }

    let mut sum_b = 0.0;
    for &(td, tm, tmp, tf, cb) in &TERMS_B {
        let arg = (td * d + tm * m + tmp * mp + tf * f).to_radians();
        sum_b += cb * e_factor(tm) * arg.sin();
    }

    let a1 = normalize_degrees(119.75 + 131.849 * t).to_radians();
    let a2 = normalize_degrees(53.09 + 479264.290 * t).to_radians();
    let a3 = normalize_degrees(313.45 + 481266.484 * t).to_radians();
    let (lp_r, mp_r, f_r) = (lp.to_radians(), mp.to_radians(), f.to_radians());

    sum_l += 3958.0 * a1.sin() + 1962.0 * (lp_r - f_r).sin() + 318.0 * a2.sin();
    sum_b += -2235.0 * lp_r.sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - f_r).sin()
        + 175.0 * (a1 + f_r).sin()
        + 127.0 * (lp_r - mp_r).sin()
        - 115.0 * (lp_r + mp_r).sin();

    (
        normalize_degrees(lp + sum_l / 1_000_000.0),
        sum_b / 1_000_000.0,
        385000.56 + sum_r / 1000.0,
    )
}

/// Moon position for `t` Julian centuries (TT) since J2000.
pub fn moon_position(t: f64) -> MoonPosition {
    let (longitude, latitude, distance_km) = ecliptic(t);
    let (right_ascension, declination) = ecliptic_to_equatorial(longitude, latitude, obliquity(t));
    MoonPosition {
        longitude,
        latitude,
        distance_km,
        right_ascension,
        declination,
    }
}

/// Moon longitude minus Sun longitude in [0, 360): 0 at new moon, 180 at full.
fn longitude_difference(t: f64) -> f64 {
    normalize_degrees(ecliptic(t).0 - solar::apparent_longitude(t))
}

/// Illuminated fraction of the lunar disk in [0, 1].
pub fn illuminated_fraction(t: f64) -> f64 {
    let moon = moon_position(t);
    let sun = solar::sun_position(t);

    let cos_elongation = moon.latitude.to_radians().cos()
        * (moon.longitude - sun.longitude).to_radians().cos();
    let elongation = cos_elongation.clamp(-1.0, 1.0).acos();

    let sun_km = sun.distance_au * AU_KM;
    let phase_angle = (sun_km * elongation.sin()).atan2(moon.distance_km - sun_km * elongation.cos());
    ((1.0 + phase_angle.cos()) / 2.0).clamp(0.0, 1.0)
}

/// Principal lunar phase, expressed as a Moon–Sun longitude difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    New,
    Full,
}

impl Phase {
    fn target(self) -> f64 {
        match self {
            Phase::New => 0.0,
            Phase::Full => 180.0,
        }
    }
}

/// First instant strictly after `jd_ut` at which the Moon reaches `phase`.
pub fn next_phase(jd_ut: f64, phase: Phase) -> f64 {
    let century = |jd: f64| super::time::julian_century(jd);
    let target = phase.target();

    let mut gap = normalize_degrees(target - longitude_difference(century(jd_ut)));
    if gap < 1e-6 {
        gap = 360.0;
    }
    let mut jd = jd_ut + gap / SYNODIC_RATE;

    // Fixed-point steps on the mean rate; converges to well under a second.
    for _ in 0..20 {
        let error = signed_degrees(target - longitude_difference(century(jd)));
        jd += error / SYNODIC_RATE;
        if error.abs() < 1e-7 {
            break;
        }
    }
    jd
}
