//! Ephemeris engine: Sun and Moon rise, transit and set for an observer,
//! plus lunar illumination and the next new and full moon.

pub mod lunar;
pub mod search;
pub mod solar;
pub mod sphere;
pub mod time;

mod observer;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub use lunar::Phase;
pub use observer::Observer;

/// A body the observer can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Body {
    Sun,
    Moon,
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Sun => write!(f, "Sun"),
            Body::Moon => write!(f, "Moon"),
        }
    }
}

/// The kind of horizon or meridian event being searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Rising,
    Transit,
    Setting,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Rising => write!(f, "rising"),
            EventKind::Transit => write!(f, "transit"),
            EventKind::Setting => write!(f, "setting"),
        }
    }
}

/// Ephemeris query failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EphemerisError {
    #[error("{body} is always above the {horizon}° horizon near {date}, no {event}")]
    AlwaysUp {
        body: Body,
        event: EventKind,
        horizon: f64,
        date: DateTime<Utc>,
    },

    #[error("{body} never reaches the {horizon}° horizon near {date}, no {event}")]
    NeverUp {
        body: Body,
        event: EventKind,
        horizon: f64,
        date: DateTime<Utc>,
    },

    #[error("no {body} {event} within {window} days of {date}")]
    NotFound {
        body: Body,
        event: EventKind,
        window: f64,
        date: DateTime<Utc>,
    },

    #[error("invalid sexagesimal angle '{0}'")]
    InvalidAngle(String),

    #[error("Julian date {0} is outside the representable range")]
    DateOutOfRange(f64),
}

impl EphemerisError {
    /// Search failures are the ordinary polar-day / polar-night outcome;
    /// the rest mean the engine was handed something it cannot represent.
    pub fn is_search_failure(&self) -> bool {
        matches!(
            self,
            Self::AlwaysUp { .. } | Self::NeverUp { .. } | Self::NotFound { .. }
        )
    }
}

/// Illuminated fraction of the Moon's disk at `date`, in [0, 1].
pub fn moon_phase(date: &DateTime<Utc>) -> f64 {
    lunar::illuminated_fraction(time::julian_century(time::julian_date(date)))
}

/// First new moon strictly after `date`.
pub fn next_new_moon(date: &DateTime<Utc>) -> Result<DateTime<Utc>, EphemerisError> {
    next_phase(date, Phase::New)
}

/// First full moon strictly after `date`.
pub fn next_full_moon(date: &DateTime<Utc>) -> Result<DateTime<Utc>, EphemerisError> {
    next_phase(date, Phase::Full)
}

fn next_phase(date: &DateTime<Utc>, phase: Phase) -> Result<DateTime<Utc>, EphemerisError> {
    let jd = lunar::next_phase(time::julian_date(date), phase);
    time::from_julian_date(jd).ok_or(EphemerisError::DateOutOfRange(jd))
}
