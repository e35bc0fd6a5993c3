//! Solar and lunar almanac for one observer point and one date.
//!
//! Pipeline: zone table → date → offset → observer point → ephemeris → report.

pub mod almanac;
pub mod dms;
pub mod ephem;
pub mod error;
pub mod features;
pub mod report;
pub mod toolbox;
pub mod zones;
