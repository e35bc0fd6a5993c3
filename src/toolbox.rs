//! The four-input almanac tool: features, date, zone name, output path.

use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::almanac::{self, AlmanacRequest};
use crate::error::{AlmanacError, Result};
use crate::features;
use crate::report::{self, ReportFormat};
use crate::zones::{ZoneTable, ZoneTableSource};

/// Resolved tool inputs.
#[derive(Debug, Clone)]
pub struct ToolParameters {
    pub input_features: PathBuf,
    /// Report date as `M/D/Y`.
    pub date: String,
    /// Display name looked up in the zone table.
    pub utc_zone: String,
    pub output: PathBuf,
    pub overwrite: bool,
    pub zone_table: ZoneTableSource,
    pub format: ReportFormat,
}

/// Parse an `M/D/Y` date. Exactly three numeric fields, no time part.
pub fn parse_report_date(text: &str) -> Result<NaiveDate> {
    let malformed = || AlmanacError::MalformedDate(text.to_string());

    let fields: Vec<&str> = text.trim().split('/').collect();
    let [month, day, year] = fields.as_slice() else {
        return Err(malformed());
    };
    let month: u32 = month.trim().parse().map_err(|_| malformed())?;
    let day: u32 = day.trim().parse().map_err(|_| malformed())?;
    let year: i32 = year.trim().parse().map_err(|_| malformed())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(malformed)
}

/// Run the whole pipeline and return the path of the written report.
///
/// The zone table and the date are checked before the feature source is
/// opened, so a bad zone name or date never touches the input.
pub fn run(params: &ToolParameters) -> Result<PathBuf> {
    let zones = ZoneTable::load(&params.zone_table)?;
    let date = parse_report_date(&params.date)?;
    let offset = zones.resolve(&params.utc_zone)?;
    debug!(zone = %params.utc_zone, %offset, %date, "inputs resolved");

    let point = features::read_first_point(&params.input_features)?;
    let request = AlmanacRequest {
        point,
        date,
        zone_name: params.utc_zone.clone(),
        offset,
    };
    let almanac = almanac::compute(&request)?;

    let contents = report::render(&almanac, params.format)?;
    report::write_report(&params.output, &contents, params.overwrite)?;

    info!("Report file is in {}", params.output.display());
    Ok(params.output.clone())
}
