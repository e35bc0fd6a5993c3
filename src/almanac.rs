//! The almanac computation: one observer, one date, one fixed offset.
//!
//! Every event is found in UTC by the ephemeris engine and shifted by the
//! zone offset exactly once before it lands in a record. Searches start at
//! the observer's mean-solar midnight, so the zone only affects display.
//!
//! Twilight "begin" is the *previous* rising at the depression angle while
//! "end" is the *next* setting; the moonrise is likewise the *previous*
//! rising while transit and set are *next*. This brackets the night around
//! the report date and is intentional.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::dms::dd_to_dms;
use crate::ephem::{self, Body, Observer};
use crate::error::Result;
use crate::features::ObserverPoint;
use crate::zones::UtcOffset;

const CIVIL_DEPRESSION: f64 = -6.0;
const NAUTICAL_DEPRESSION: f64 = -12.0;
const ASTRONOMICAL_DEPRESSION: f64 = -18.0;

/// Everything one almanac computation needs.
#[derive(Debug, Clone)]
pub struct AlmanacRequest {
    pub point: ObserverPoint,
    pub date: NaiveDate,
    pub zone_name: String,
    pub offset: UtcOffset,
}

/// Solar events in civil time, in display order.
#[derive(Debug, Clone, Serialize)]
pub struct SolarEvents {
    pub astronomical_twilight_begin: NaiveDateTime,
    pub nautical_twilight_begin: NaiveDateTime,
    pub civil_twilight_begin: NaiveDateTime,
    pub sunrise: NaiveDateTime,
    pub solar_transit: NaiveDateTime,
    pub sunset: NaiveDateTime,
    pub civil_twilight_end: NaiveDateTime,
    pub nautical_twilight_end: NaiveDateTime,
    pub astronomical_twilight_end: NaiveDateTime,
}

impl SolarEvents {
    pub fn rows(&self) -> [(&'static str, NaiveDateTime); 9] {
        [
            ("Astronomical Twilight Begin", self.astronomical_twilight_begin),
            ("Nautical Twilight Begin", self.nautical_twilight_begin),
            ("Civil Twilight Begin", self.civil_twilight_begin),
            ("Sunrise", self.sunrise),
            ("Solar Transit", self.solar_transit),
            ("Sunset", self.sunset),
            ("Civil Twilight End", self.civil_twilight_end),
            ("Nautical Twilight End", self.nautical_twilight_end),
            ("Astronomical Twilight End", self.astronomical_twilight_end),
        ]
    }
}

/// Illuminated share of the lunar disk, as a percentage in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoonPhase {
    pub illuminated_percent: f64,
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% illuminated", self.illuminated_percent)
    }
}

/// Lunar events in civil time.
#[derive(Debug, Clone, Serialize)]
pub struct LunarEvents {
    pub moonrise: NaiveDateTime,
    pub moon_transit: NaiveDateTime,
    pub moonset: NaiveDateTime,
    pub phase: MoonPhase,
    pub next_new_moon: NaiveDateTime,
    pub next_full_moon: NaiveDateTime,
}

impl LunarEvents {
    pub fn rows(&self) -> [(&'static str, String); 6] {
        [
            ("Moonrise", format_civil(&self.moonrise)),
            ("Moon Transit", format_civil(&self.moon_transit)),
            ("Moonset", format_civil(&self.moonset)),
            ("Moon Phase (%)", self.phase.to_string()),
            ("Next New Moon", format_civil(&self.next_new_moon)),
            ("Next Full Moon", format_civil(&self.next_full_moon)),
        ]
    }
}

/// A complete almanac for one observer and date.
#[derive(Debug, Clone, Serialize)]
pub struct Almanac {
    /// Local midnight that starts the report date.
    pub report_date: NaiveDateTime,
    pub utc_zone: String,
    pub utc_offset: UtcOffset,
    pub location: ObserverPoint,
    pub solar: SolarEvents,
    pub lunar: LunarEvents,
}

/// Civil timestamps render to whole seconds.
pub fn format_civil(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Mean-solar midnight of `date` at `longitude`, as a UTC instant.
fn solar_midnight_utc(date: NaiveDate, longitude: f64) -> DateTime<Utc> {
    let lag = Duration::milliseconds((longitude / 15.0 * 3_600_000.0).round() as i64);
    date.and_time(NaiveTime::MIN).and_utc() - lag
}

/// Compute the almanac. Any event the engine cannot find aborts the whole run.
pub fn compute(request: &AlmanacRequest) -> Result<Almanac> {
    let shift = request.offset.as_duration();
    let civil = |utc: DateTime<Utc>| utc.naive_utc() + shift;

    let start = solar_midnight_utc(request.date, request.point.longitude);
    let mut observer = Observer::from_sexagesimal(
        &dd_to_dms(request.point.latitude),
        &dd_to_dms(request.point.longitude),
        start,
    )?;
    debug!(
        lat = observer.latitude(),
        lon = observer.longitude(),
        %start,
        offset = %request.offset,
        "observer ready"
    );

    // Sun at the horizon.
    observer.horizon = 0.0;
    let sunrise = civil(observer.next_rising(Body::Sun)?);
    let solar_transit = civil(observer.next_transit(Body::Sun)?);
    let sunset = civil(observer.next_setting(Body::Sun)?);

    // Moon, independent of the twilight passes.
    let lunar = LunarEvents {
        moonrise: civil(observer.previous_rising(Body::Moon)?),
        moon_transit: civil(observer.next_transit(Body::Moon)?),
        moonset: civil(observer.next_setting(Body::Moon)?),
        phase: MoonPhase { illuminated_percent: ephem::moon_phase(&start) * 100.0 },
        next_new_moon: civil(ephem::next_new_moon(&start)?),
        next_full_moon: civil(ephem::next_full_moon(&start)?),
    };

    let mut twilight = |depression: f64| -> Result<(NaiveDateTime, NaiveDateTime)> {
        observer.horizon = depression;
        let begin = civil(observer.previous_rising(Body::Sun)?);
        let end = civil(observer.next_setting(Body::Sun)?);
        Ok((begin, end))
    };
    let (civil_twilight_begin, civil_twilight_end) = twilight(CIVIL_DEPRESSION)?;
    let (nautical_twilight_begin, nautical_twilight_end) = twilight(NAUTICAL_DEPRESSION)?;
    let (astronomical_twilight_begin, astronomical_twilight_end) = twilight(ASTRONOMICAL_DEPRESSION)?;

    Ok(Almanac {
        report_date: request.date.and_time(NaiveTime::MIN),
        utc_zone: request.zone_name.clone(),
        utc_offset: request.offset,
        location: request.point,
        solar: SolarEvents {
            astronomical_twilight_begin,
            nautical_twilight_begin,
            civil_twilight_begin,
            sunrise,
            solar_transit,
            sunset,
            civil_twilight_end,
            nautical_twilight_end,
            astronomical_twilight_end,
        },
        lunar,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephem::EphemerisError;
    use crate::error::AlmanacError;

    fn request(lon: f64, lat: f64, date: NaiveDate, bias: i32) -> AlmanacRequest {
        AlmanacRequest {
            point: ObserverPoint::new(lon, lat).unwrap(),
            date,
            zone_name: "test zone".into(),
            offset: UtcOffset::from_bias_minutes(bias),
        }
    }

    fn amboy() -> AlmanacRequest {
        request(-115.689, 34.428, NaiveDate::from_ymd_opt(2010, 4, 15).unwrap(), -480)
    }

    #[test]
    fn test_report_date_is_local_midnight() {
        let almanac = compute(&amboy()).unwrap();
        assert_eq!(format_civil(&almanac.report_date), "2010-04-15 00:00:00");
        assert_eq!(almanac.location.to_string(), "-115.689, 34.428");
    }

    #[test]
    fn test_solar_rows_in_display_order_and_monotonic() {
        let almanac = compute(&amboy()).unwrap();
        let rows = almanac.solar.rows();
        let labels: Vec<&str> = rows.iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            [
                "Astronomical Twilight Begin",
                "Nautical Twilight Begin",
                "Civil Twilight Begin",
                "Sunrise",
                "Solar Transit",
                "Sunset",
                "Civil Twilight End",
                "Nautical Twilight End",
                "Astronomical Twilight End",
            ]
        );
        for pair in rows.windows(2) {
            assert!(pair[0].1 <= pair[1].1, "{} {} > {} {}", pair[0].0, pair[0].1, pair[1].0, pair[1].1);
        }
    }

    #[test]
    fn test_sun_times_are_civil() {
        let almanac = compute(&amboy()).unwrap();
        let day = NaiveDate::from_ymd_opt(2010, 4, 15).unwrap();
        assert_eq!(almanac.solar.sunrise.date(), day);
        assert_eq!(almanac.solar.solar_transit.date(), day);
        assert_eq!(almanac.solar.sunset.date(), day);
        let noon = day.and_hms_opt(11, 43, 0).unwrap();
        assert!((almanac.solar.solar_transit - noon).num_minutes().abs() <= 5);
    }

    #[test]
    fn test_offset_applied_exactly_once() {
        let pacific = compute(&amboy()).unwrap();
        let mut utc_request = amboy();
        utc_request.offset = UtcOffset::from_bias_minutes(0);
        let utc = compute(&utc_request).unwrap();
        let shift = utc.solar.solar_transit - pacific.solar.solar_transit;
        assert_eq!(shift.num_minutes(), Duration::hours(8).num_minutes());
    }

    #[test]
    fn test_ordering_holds_for_zones_off_the_local_meridian() {
        for bias in [0, 540, -480, 840] {
            let mut r = amboy();
            r.offset = UtcOffset::from_bias_minutes(bias);
            let almanac = compute(&r).unwrap();
            for pair in almanac.solar.rows().windows(2) {
                assert!(
                    pair[0].1 <= pair[1].1,
                    "bias {bias}: {} {} > {} {}",
                    pair[0].0, pair[0].1, pair[1].0, pair[1].1
                );
            }
            assert_eq!(format_civil(&almanac.report_date), "2010-04-15 00:00:00");
        }
    }

    #[test]
    fn test_solar_midnight_follows_longitude() {
        let day = NaiveDate::from_ymd_opt(2010, 4, 15).unwrap();
        let amboy = solar_midnight_utc(day, -115.689);
        assert_eq!(amboy.format("%Y-%m-%d %H:%M").to_string(), "2010-04-15 07:42");
        let tokyo = solar_midnight_utc(day, 135.0);
        assert_eq!(tokyo.format("%Y-%m-%d %H:%M").to_string(), "2010-04-14 15:00");
    }

    #[test]
    fn test_lunar_rows_and_phase_label() {
        let almanac = compute(&amboy()).unwrap();
        let rows = almanac.lunar.rows();
        let labels: Vec<&str> = rows.iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            ["Moonrise", "Moon Transit", "Moonset", "Moon Phase (%)", "Next New Moon", "Next Full Moon"]
        );

        let phase = &rows[3].1;
        assert!(phase.ends_with("% illuminated"), "{phase}");
        let pct: f64 = phase.trim_end_matches("% illuminated").parse().unwrap();
        assert!((0.0..=100.0).contains(&pct));
        assert!(pct < 3.0, "a day after new moon, got {pct}");
    }

    #[test]
    fn test_moon_bracketing() {
        let almanac = compute(&amboy()).unwrap();
        assert!(almanac.lunar.moonrise < almanac.report_date);
        assert!(almanac.lunar.moon_transit > almanac.report_date);
        assert!(almanac.lunar.moonset > almanac.report_date);
        assert!(almanac.lunar.next_full_moon < almanac.lunar.next_new_moon);

        // Next new moon 2010-05-14 01:04 UTC is 2010-05-13 17:04 at UTC-8.
        let expected = NaiveDate::from_ymd_opt(2010, 5, 13).unwrap().and_hms_opt(17, 4, 0).unwrap();
        assert!((almanac.lunar.next_new_moon - expected).num_hours().abs() < 3);
    }

    #[test]
    fn test_polar_night_propagates() {
        let svalbard = request(15.6267, 78.2232, NaiveDate::from_ymd_opt(2025, 12, 21).unwrap(), 60);
        let err = compute(&svalbard).unwrap_err();
        assert!(
            matches!(err, AlmanacError::Ephemeris(EphemerisError::NeverUp { body: Body::Sun, .. })),
            "{err}"
        );
    }

    #[test]
    fn test_southern_hemisphere_ordering() {
        // Sydney near the June solstice, UTC+10.
        let sydney = request(151.2093, -33.8688, NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(), 600);
        let almanac = compute(&sydney).unwrap();
        for pair in almanac.solar.rows().windows(2) {
            assert!(pair[0].1 <= pair[1].1, "{} > {}", pair[0].0, pair[1].0);
        }
    }
}
