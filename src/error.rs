//! Run-level error taxonomy.

use std::path::PathBuf;
use thiserror::Error;

use crate::ephem::EphemerisError;

/// Every way an almanac run can fail. All of them abort the run.
#[derive(Debug, Error)]
pub enum AlmanacError {
    #[error("time zone '{0}' is not in the zone table")]
    ZoneNotFound(String),

    #[error("malformed date '{0}', expected M/D/Y")]
    MalformedDate(String),

    #[error("no point feature with usable coordinates in {}", .0.display())]
    NoCoordinateFeature(PathBuf),

    #[error("cannot read features from {}: {message}", path.display())]
    FeatureSource { path: PathBuf, message: String },

    #[error("invalid zone table {origin}: {message}")]
    ZoneTable { origin: String, message: String },

    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),

    #[error("cannot encode report: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("output file {} already exists and overwrite is off", .0.display())]
    OutputExists(PathBuf),

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which reporting channel an error belongs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Failures inside a collaborator: the feature source, the zone table,
    /// or the ephemeris engine rejecting its input.
    Host,
    /// Everything else, including rise/set searches that find no event.
    Other,
}

impl AlmanacError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::FeatureSource { .. } | Self::ZoneTable { .. } => ErrorClass::Host,
            Self::Ephemeris(e) if !e.is_search_failure() => ErrorClass::Host,
            _ => ErrorClass::Other,
        }
    }

    /// The text reported for this error. Host errors are a single message;
    /// everything else carries its `source()` chain, one cause per line.
    pub fn diagnostic(&self) -> String {
        let mut text = self.to_string();
        if self.class() == ErrorClass::Other {
            let mut source = std::error::Error::source(self);
            while let Some(cause) = source {
                text.push_str(&format!("\n  caused by: {}", cause));
                source = cause.source();
            }
        }
        text
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, AlmanacError>;
