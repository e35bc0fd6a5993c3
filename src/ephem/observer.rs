//! A fixed place and starting instant from which rise, transit and set
//! events are searched. The horizon is mutable so one observer can be
//! reused across the twilight depressions.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::search::{self, Direction, SearchFailure, SEARCH_WINDOW_DAYS};
use super::{lunar, solar, sphere, time};
use super::{Body, EphemerisError, EventKind};
use crate::dms::parse_dms;

/// Standard refraction at the horizon, degrees.
const HORIZON_REFRACTION: f64 = 34.0 / 60.0;

/// Below this horizon the refraction term is dropped.
const REFRACTION_FLOOR: f64 = -1.0;

/// Altitude, hour angle and apparent radius of a body at one instant.
#[derive(Debug, Clone, Copy)]
struct Topocentric {
    altitude: f64,
    hour_angle: f64,
    semidiameter: f64,
}

#[derive(Debug, Clone)]
pub struct Observer {
    latitude: f64,
    longitude: f64,
    /// Search origin.
    pub date: DateTime<Utc>,
    /// Horizon altitude in degrees; negative for twilight depressions.
    pub horizon: f64,
}

impl Observer {
    pub fn new(latitude: f64, longitude: f64, date: DateTime<Utc>) -> Self {
        Self { latitude, longitude, date, horizon: 0.0 }
    }

    /// Build an observer from sexagesimal latitude and longitude strings.
    pub fn from_sexagesimal(lat: &str, lon: &str, date: DateTime<Utc>) -> Result<Self, EphemerisError> {
        let angle = |s: &str| parse_dms(s).ok_or_else(|| EphemerisError::InvalidAngle(s.to_string()));
        Ok(Self::new(angle(lat)?, angle(lon)?, date))
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    fn locate(&self, body: Body, jd: f64) -> Topocentric {
        let t = time::julian_century(jd);
        let lst = sphere::local_sidereal_time(jd, self.longitude);
        match body {
            Body::Sun => {
                let sun = solar::sun_position(t);
                let hour_angle = sphere::hour_angle(lst, sun.right_ascension);
                Topocentric {
                    altitude: sphere::altitude(sun.declination, self.latitude, hour_angle),
                    hour_angle,
                    semidiameter: solar::SEMIDIAMETER,
                }
            }
            Body::Moon => {
                let moon = lunar::moon_position(t);
                let hour_angle = sphere::hour_angle(lst, moon.right_ascension);
                let geocentric = sphere::altitude(moon.declination, self.latitude, hour_angle);
                Topocentric {
                    altitude: moon.topocentric_altitude(geocentric),
                    hour_angle,
                    semidiameter: moon.semidiameter(),
                }
            }
        }
    }

    /// Geometric altitude of the body's centre at which its upper limb
    /// appears on the current horizon.
    fn limb_offset(&self, semidiameter: f64) -> f64 {
        let refraction = if self.horizon >= REFRACTION_FLOOR { HORIZON_REFRACTION } else { 0.0 };
        self.horizon - refraction - semidiameter
    }

    /// Topocentric altitude of the body's centre at `date`, degrees.
    pub fn altitude(&self, body: Body, date: &DateTime<Utc>) -> f64 {
        self.locate(body, time::julian_date(date)).altitude
    }

    pub fn next_rising(&self, body: Body) -> Result<DateTime<Utc>, EphemerisError> {
        self.find(body, EventKind::Rising, Direction::Next)
    }

    pub fn previous_rising(&self, body: Body) -> Result<DateTime<Utc>, EphemerisError> {
        self.find(body, EventKind::Rising, Direction::Previous)
    }

    pub fn next_setting(&self, body: Body) -> Result<DateTime<Utc>, EphemerisError> {
        self.find(body, EventKind::Setting, Direction::Next)
    }

    /// Next upper meridian passage. Independent of the horizon.
    pub fn next_transit(&self, body: Body) -> Result<DateTime<Utc>, EphemerisError> {
        self.find(body, EventKind::Transit, Direction::Next)
    }

    fn find(&self, body: Body, event: EventKind, direction: Direction) -> Result<DateTime<Utc>, EphemerisError> {
        let start = time::julian_date(&self.date);

        let found = match event {
            EventKind::Rising => search::find_upward_crossing(
                |jd| {
                    let pos = self.locate(body, jd);
                    pos.altitude - self.limb_offset(pos.semidiameter)
                },
                start,
                direction,
            ),
            EventKind::Setting => search::find_upward_crossing(
                |jd| {
                    let pos = self.locate(body, jd);
                    self.limb_offset(pos.semidiameter) - pos.altitude
                },
                start,
                direction,
            ),
            EventKind::Transit => {
                search::find_upward_crossing(|jd| self.locate(body, jd).hour_angle, start, direction)
            }
        };

        let jd = found.map_err(|failure| self.search_error(body, event, failure))?;
        let at = time::from_julian_date(jd).ok_or(EphemerisError::DateOutOfRange(jd))?;
        debug!(%body, %event, horizon = self.horizon, %at, "ephemeris event");
        Ok(at)
    }

    fn search_error(&self, body: Body, event: EventKind, failure: SearchFailure) -> EphemerisError {
        let (horizon, date) = (self.horizon, self.date);
        // For settings the searched function is negated altitude.
        let above = match (event, failure) {
            (EventKind::Rising, SearchFailure::AlwaysNonNegative) => Some(true),
            (EventKind::Rising, SearchFailure::AlwaysNegative) => Some(false),
            (EventKind::Setting, SearchFailure::AlwaysNonNegative) => Some(false),
            (EventKind::Setting, SearchFailure::AlwaysNegative) => Some(true),
            _ => None,
        };
        match above {
            Some(true) => EphemerisError::AlwaysUp { body, event, horizon, date },
            Some(false) => EphemerisError::NeverUp { body, event, horizon, date },
            None => EphemerisError::NotFound { body, event, window: SEARCH_WINDOW_DAYS, date },
        }
    }
}
