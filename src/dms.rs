//! Decimal degrees to and from `degrees:minutes:seconds` strings.

/// Round half-up to an integer. Positive inputs only: `2.5 -> 3`, `2.4 -> 2`.
pub fn round_half_up(a: f64) -> i64 {
    let whole = a.trunc();
    if a - whole >= 0.5 {
        a.ceil() as i64
    } else {
        a.floor() as i64
    }
}

/// Format decimal degrees as `D:M:S`.
///
/// Degrees truncate toward zero, minutes truncate, seconds round half-up.
/// A rounded 60 carries upward so minutes and seconds stay in `0..=59`.
/// Values in (-1, 0) keep their sign as `-0:M:S`.
pub fn dd_to_dms(dd: f64) -> String {
    let negative = dd < 0.0;
    let magnitude = dd.abs();

    let mut degrees = magnitude.trunc() as i64;
    let minutes_dec = (magnitude - degrees as f64) * 60.0;
    let mut minutes = minutes_dec.trunc() as i64;
    let mut seconds = round_half_up((minutes_dec - minutes as f64) * 60.0);

    if seconds == 60 {
        seconds = 0;
        minutes += 1;
    }
    if minutes == 60 {
        minutes = 0;
        degrees += 1;
    }

    let sign = if negative && (degrees, minutes, seconds) != (0, 0, 0) { "-" } else { "" };
    format!("{}{}:{}:{}", sign, degrees, minutes, seconds)
}

/// Parse `D`, `D:M` or `D:M:S` (optionally signed) into decimal degrees.
pub fn parse_dms(s: &str) -> Option<f64> {
    let s = s.trim();
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let mut value = 0.0;
    let mut scale = 1.0;
    let mut parts = 0;
    for part in body.split(':') {
        let field: f64 = part.trim().parse().ok()?;
        if !field.is_finite() || field < 0.0 || parts >= 3 {
            return None;
        }
        value += field / scale;
        scale *= 60.0;
        parts += 1;
    }

    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.4), 2);
        assert_eq!(round_half_up(0.5), 1);
        assert_eq!(round_half_up(3.5), 4);
        assert_eq!(round_half_up(59.49), 59);
    }

    #[test]
    fn test_observer_coordinates() {
        assert_eq!(dd_to_dms(34.428), "34:25:41");
        assert_eq!(dd_to_dms(-115.689), "-115:41:20");
    }

    #[test]
    fn test_whole_degrees() {
        assert_eq!(dd_to_dms(0.0), "0:0:0");
        assert_eq!(dd_to_dms(-18.0), "-18:0:0");
    }

    #[test]
    fn test_seconds_carry_into_minutes_and_degrees() {
        assert_eq!(dd_to_dms(10.99999), "11:0:0");
        assert_eq!(dd_to_dms(-10.99999), "-11:0:0");
    }

    #[test]
    fn test_small_negative_keeps_sign() {
        assert_eq!(dd_to_dms(-0.5), "-0:30:0");
    }

    #[test]
    fn test_formatted_fields_reconstruct_within_one_second() {
        let mut dd = -179.9;
        while dd < 180.0 {
            let text = dd_to_dms(dd);
            let fields: Vec<i64> = text
                .trim_start_matches('-')
                .split(':')
                .map(|p| p.parse().unwrap())
                .collect();
            assert!((0..=59).contains(&fields[1]), "{text}");
            assert!((0..=59).contains(&fields[2]), "{text}");
            let whole = dd.abs().trunc() as i64;
            assert!(fields[0] == whole || fields[0] == whole + 1, "{text}");

            let back = parse_dms(&text).unwrap();
            assert!((back - dd).abs() <= 1.0 / 3600.0, "{dd} -> {text} -> {back}");
            dd += 0.7331;
        }
    }

    #[test]
    fn test_parse_dms() {
        assert_abs_diff_eq!(parse_dms("-6:00:00").unwrap(), -6.0);
        assert_abs_diff_eq!(parse_dms("34:25:41").unwrap(), 34.0 + 25.0 / 60.0 + 41.0 / 3600.0);
        assert_abs_diff_eq!(parse_dms("12").unwrap(), 12.0);
        assert_abs_diff_eq!(parse_dms("-0:30").unwrap(), -0.5);
        assert!(parse_dms("").is_none());
        assert!(parse_dms("1:2:3:4").is_none());
        assert!(parse_dms("north").is_none());
        assert!(parse_dms("10:-5").is_none());
    }
}
