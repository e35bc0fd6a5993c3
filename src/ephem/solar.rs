//! Apparent geocentric position of the Sun (low-precision Meeus ch. 25).
//!
//! Accuracy is about 0.01° for dates within a few centuries of J2000, which
//! keeps rise/set instants within a few seconds.

use super::sphere::{ecliptic_to_equatorial, normalize_degrees};

/// Apparent solar semidiameter used for upper-limb rise/set, degrees.
pub const SEMIDIAMETER: f64 = 16.0 / 60.0;

/// Geocentric apparent position of the Sun.
#[derive(Debug, Clone, Copy)]
pub struct SunPosition {
    /// Apparent ecliptic longitude, degrees.
    pub longitude: f64,
    pub right_ascension: f64,
    pub declination: f64,
    pub distance_au: f64,
}

fn mean_longitude(t: f64) -> f64 {
    normalize_degrees(280.46646 + t * (36000.76983 + t * 0.0003032))
}

fn mean_anomaly(t: f64) -> f64 {
    normalize_degrees(357.52911 + t * (35999.05029 - t * 0.0001537))
}

fn eccentricity(t: f64) -> f64 {
    0.016708634 - t * (0.000042037 + t * 0.0000001267)
}

fn equation_of_center(t: f64) -> f64 {
    let m = mean_anomaly(t).to_radians();
    m.sin() * (1.914602 - t * (0.004817 + t * 0.000014))
        + (2.0 * m).sin() * (0.019993 - t * 0.000101)
        + (3.0 * m).sin() * 0.000289
}

fn ascending_node(t: f64) -> f64 {
    125.04 - 1934.136 * t
}

fn mean_obliquity(t: f64) -> f64 {
    23.0 + (26.0 + (21.448 - t * (46.815 + t * (0.00059 - t * 0.001813))) / 60.0) / 60.0
}

/// Obliquity of the ecliptic corrected for the main nutation term, degrees.
pub fn obliquity(t: f64) -> f64 {
    mean_obliquity(t) + 0.00256 * ascending_node(t).to_radians().cos()
}

/// Apparent ecliptic longitude of the Sun, degrees.
pub fn apparent_longitude(t: f64) -> f64 {
    let true_longitude = mean_longitude(t) + equation_of_center(t);
    normalize_degrees(true_longitude - 0.00569 - 0.00478 * ascending_node(t).to_radians().sin())
}

/// Earth–Sun distance in astronomical units.
pub fn distance_au(t: f64) -> f64 {
    let e = eccentricity(t);
    let v = (mean_anomaly(t) + equation_of_center(t)).to_radians();
    1.000001018 * (1.0 - e * e) / (1.0 + e * v.cos())
}

/// Sun position for `t` Julian centuries (TT) since J2000.
pub fn sun_position(t: f64) -> SunPosition {
    let longitude = apparent_longitude(t);
    let (right_ascension, declination) = ecliptic_to_equatorial(longitude, 0.0, obliquity(t));
    SunPosition {
        longitude,
        right_ascension,
        declination,
        distance_au: distance_au(t),
    }
}
