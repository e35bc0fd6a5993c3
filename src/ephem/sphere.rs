//! Spherical astronomy helpers shared by the Sun and Moon calculators.

use super::time::J2000;

/// Wrap an angle into [0, 360).
pub fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d >= 360.0 { 0.0 } else { d }
}

/// Wrap an angle into [-180, 180).
pub fn signed_degrees(deg: f64) -> f64 {
    let d = normalize_degrees(deg);
    if d >= 180.0 { d - 360.0 } else { d }
}

/// Local mean sidereal time in degrees for a UT Julian Date and east longitude.
pub fn local_sidereal_time(jd_ut: f64, lon: f64) -> f64 {
    let t = (jd_ut - J2000) / 36525.0;
    let gmst = 280.46061837
        + 360.98564736629 * (jd_ut - J2000)
        + 0.000387933 * t * t
        - t * t * t / 38710000.0;
    normalize_degrees(gmst + lon)
}

/// Ecliptic (longitude, latitude) to equatorial (right ascension, declination), degrees.
pub fn ecliptic_to_equatorial(lon: f64, lat: f64, obliquity: f64) -> (f64, f64) {
    let (lon_r, lat_r, obl_r) = (lon.to_radians(), lat.to_radians(), obliquity.to_radians());

    let y = lon_r.sin() * obl_r.cos() - lat_r.tan() * obl_r.sin();
    let ra = normalize_degrees(y.atan2(lon_r.cos()).to_degrees());

    let sin_dec = lat_r.sin() * obl_r.cos() + lat_r.cos() * obl_r.sin() * lon_r.sin();
    let dec = sin_dec.clamp(-1.0, 1.0).asin().to_degrees();

    (ra, dec)
}

/// Local hour angle in [-180, 180): negative before the upper meridian crossing.
pub fn hour_angle(lst: f64, ra: f64) -> f64 {
    signed_degrees(lst - ra)
}

/// Geometric altitude of a point with declination `dec` at hour angle `ha`.
pub fn altitude(dec: f64, lat: f64, ha: f64) -> f64 {
    let (dec_r, lat_r, ha_r) = (dec.to_radians(), lat.to_radians(), ha.to_radians());
    let sin_alt = lat_r.sin() * dec_r.sin() + lat_r.cos() * dec_r.cos() * ha_r.cos();
    sin_alt.clamp(-1.0, 1.0).asin().to_degrees()
}
