use clap::Parser;
use std::path::PathBuf;
use tracing::{error, Level};

use almanac::error::{AlmanacError, ErrorClass};
use almanac::report::ReportFormat;
use almanac::toolbox::{self, ToolParameters};
use almanac::zones::ZoneTableSource;

/// Almanac: solar and lunar events for one point and one date.
///
/// Reads the first point feature from a GeoJSON file, computes twilight,
/// sunrise, transit, sunset, moonrise, moonset and lunar phase for the
/// given date in a fixed UTC-offset zone, and writes an HTML report.
///
/// Examples:
///   almanac amboy.geojson 4/15/2010 "(UTC-08:00) Pacific Time (US & Canada)" amboy.html
///   almanac pts.geojson 6/21/2024 "(UTC) Coordinated Universal Time" out.json --format json --overwrite
#[derive(Parser)]
#[command(name = "almanac", version, about, long_about = None)]
struct Cli {
    /// GeoJSON point features; the first point is the observer.
    #[arg(index = 1)]
    input_features: PathBuf,

    /// Report date (M/D/Y).
    #[arg(index = 2)]
    date: String,

    /// Zone display name, e.g. "(UTC-08:00) Pacific Time (US & Canada)".
    #[arg(index = 3)]
    utc_zone: String,

    /// Report file to write.
    #[arg(index = 4)]
    output: PathBuf,

    /// Replace the output file if it already exists.
    #[arg(long, env = "ALMANAC_OVERWRITE_OUTPUT")]
    overwrite: bool,

    /// Zone table XML. Defaults to <config dir>/almanac/TimeZones.xml, then the bundled table.
    #[arg(long, env = "ALMANAC_ZONE_TABLE")]
    zone_table: Option<PathBuf>,

    /// Report format: "html" or "json".
    #[arg(long, default_value = "html", value_parser = parse_format)]
    format: ReportFormat,

    /// Log engine queries and resolved inputs.
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn parse_format(s: &str) -> Result<ReportFormat, String> {
    match s.to_lowercase().as_str() {
        "html" | "htm" => Ok(ReportFormat::Html),
        "json" => Ok(ReportFormat::Json),
        _ => Err(format!("Unknown format '{}'. Use 'html' or 'json'.", s)),
    }
}

fn report_failure(err: &AlmanacError) {
    match err.class() {
        ErrorClass::Host => error!("{}", err.diagnostic()),
        ErrorClass::Other => error!(error = ?err, "{}", err.diagnostic()),
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    let params = ToolParameters {
        input_features: cli.input_features,
        date: cli.date,
        utc_zone: cli.utc_zone,
        output: cli.output,
        overwrite: cli.overwrite,
        zone_table: ZoneTableSource::discover(cli.zone_table),
        format: cli.format,
    };

    if let Err(err) = toolbox::run(&params) {
        report_failure(&err);
        std::process::exit(1);
    }
}
