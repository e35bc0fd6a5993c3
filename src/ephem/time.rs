//! Julian Date conversions for UTC instants.

use chrono::{DateTime, Utc};

/// Julian Date of the J2000.0 epoch.
pub const J2000: f64 = 2451545.0;

const UNIX_EPOCH_JD: f64 = 2440587.5;
const SECONDS_PER_DAY: f64 = 86400.0;

/// TT − UT in seconds. Held fixed; the drift over a few decades is well below
/// the precision of the truncated lunar series.
pub const DELTA_T_SECONDS: f64 = 69.0;

/// Convert a UTC instant to a Julian Date (UT).
pub fn julian_date(dt: &DateTime<Utc>) -> f64 {
    let secs = dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 * 1e-9;
    UNIX_EPOCH_JD + secs / SECONDS_PER_DAY
}

/// Convert a Julian Date (UT) back to a UTC instant, rounded to the millisecond.
pub fn from_julian_date(jd: f64) -> Option<DateTime<Utc>> {
    if !jd.is_finite() {
        return None;
    }
    let millis = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1000.0).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

/// Julian centuries of dynamical time since J2000 for a UT Julian Date.
pub fn julian_century(jd_ut: f64) -> f64 {
    (jd_ut + DELTA_T_SECONDS / SECONDS_PER_DAY - J2000) / 36525.0
}
