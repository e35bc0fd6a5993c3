//! Named fixed UTC offsets read from an XML zone table.
//!
//! The table is a root element whose `TimeZone` children each carry a `DisplayName`
//! and a `DefaultRule/Bias` in minutes (local time minus UTC):
//!
//! ```xml
//! <TimeZones>
//!   <TimeZone>
//!     <DisplayName>(UTC-08:00) Pacific Time (US &amp; Canada)</DisplayName>
//!     <DefaultRule><Bias>-480</Bias></DefaultRule>
//!   </TimeZone>
//! </TimeZones>
//! ```

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AlmanacError, Result};

/// Zone table shipped with the binary.
const BUNDLED_TABLE: &str = include_str!("../data/TimeZones.xml");

/// File name looked for under the user's config directory.
const USER_TABLE_FILE: &str = "TimeZones.xml";

/// A fixed civil-time correction: `hours * 3600 + minutes * 60 + seconds`.
///
/// `hours` carries the sign; `minutes` is a non-negative adjustment on top of
/// it, so UTC-03:30 is `(-4, 30, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UtcOffset {
    pub hours: i32,
    pub minutes: i32,
    pub seconds: i32,
}

impl UtcOffset {
    pub fn from_bias_minutes(bias: i32) -> Self {
        Self {
            hours: bias.div_euclid(60),
            minutes: (bias % 60).abs(),
            seconds: 0,
        }
    }

    pub fn total_seconds(&self) -> i64 {
        self.hours as i64 * 3600 + self.minutes as i64 * 60 + self.seconds as i64
    }

    pub fn as_duration(&self) -> Duration {
        Duration::seconds(self.total_seconds())
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total_seconds();
        let sign = if total < 0 { '-' } else { '+' };
        let abs = total.abs();
        write!(f, "UTC{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)?;
        if abs % 60 != 0 {
            write!(f, ":{:02}", abs % 60)?;
        }
        Ok(())
    }
}

// ─── XML shape ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct TableDoc {
    #[serde(rename = "TimeZone", default)]
    entries: Vec<ZoneEntry>,
}

#[derive(Deserialize)]
struct ZoneEntry {
    #[serde(rename = "DisplayName")]
    display_name: String,
    #[serde(rename = "DefaultRule")]
    default_rule: DefaultRule,
}

#[derive(Deserialize)]
struct DefaultRule {
    #[serde(rename = "Bias")]
    bias: i32,
}

// ─── Table source ───────────────────────────────────────────────

/// Where the zone table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneTableSource {
    File(PathBuf),
    Bundled,
}

impl ZoneTableSource {
    /// Explicit path first, then `<config dir>/almanac/TimeZones.xml` if it
    /// exists, then the bundled table.
    pub fn discover(explicit: Option<PathBuf>) -> Self {
        if let Some(path) = explicit {
            return Self::File(path);
        }
        match Self::user_table_path() {
            Some(path) if path.is_file() => Self::File(path),
            _ => Self::Bundled,
        }
    }

    fn user_table_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("almanac").join(USER_TABLE_FILE))
    }
}

impl fmt::Display for ZoneTableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Bundled => write!(f, "bundled zone table"),
        }
    }
}

// ─── Table ──────────────────────────────────────────────────────

/// Display name → offset. Loaded fresh on each run.
#[derive(Debug, Clone)]
pub struct ZoneTable {
    offsets: HashMap<String, UtcOffset>,
}

impl ZoneTable {
    pub fn load(source: &ZoneTableSource) -> Result<Self> {
        let table = match source {
            ZoneTableSource::File(path) => Self::load_file(path)?,
            ZoneTableSource::Bundled => Self::parse(BUNDLED_TABLE, "bundled zone table")?,
        };
        debug!(source = %source, zones = table.len(), "zone table loaded");
        Ok(table)
    }

    fn load_file(path: &Path) -> Result<Self> {
        let xml = fs::read_to_string(path).map_err(|e| AlmanacError::ZoneTable {
            origin: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&xml, &path.display().to_string())
    }

    /// Parse a table. Later entries replace earlier ones with the same name.
    pub fn parse(xml: &str, origin: &str) -> Result<Self> {
        let doc: TableDoc = quick_xml::de::from_str(xml).map_err(|e| AlmanacError::ZoneTable {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;

        let offsets = doc
            .entries
            .into_iter()
            .map(|z| (z.display_name.trim().to_string(), UtcOffset::from_bias_minutes(z.default_rule.bias)))
            .collect();
        Ok(Self { offsets })
    }

    /// Look up a display name. Surrounding whitespace is ignored, as it is
    /// when the table is parsed.
    pub fn resolve(&self, name: &str) -> Result<UtcOffset> {
        self.offsets
            .get(name.trim())
            .copied()
            .ok_or_else(|| AlmanacError::ZoneNotFound(name.to_string()))
    }

    /// All display names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.offsets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
