//! Report rendering and the output-file overwrite policy.

use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::almanac::{format_civil, Almanac};
use crate::error::{AlmanacError, Result};

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Html,
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Html => write!(f, "html"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

pub fn render(almanac: &Almanac, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Html => Ok(render_html(almanac)),
        ReportFormat::Json => render_json(almanac),
    }
}

/// The same record as pretty-printed JSON, timestamps in ISO 8601 civil time.
pub fn render_json(almanac: &Almanac) -> Result<String> {
    Ok(serde_json::to_string_pretty(almanac)?)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn push_row(html: &mut String, label: &str, value: &str) {
    html.push_str(&format!("<TR><TD>{}</TD><TD>{}</TD></TR>", label, escape_html(value)));
}

/// The fixed two-table HTML report.
pub fn render_html(almanac: &Almanac) -> String {
    let mut html = String::new();
    html.push_str(r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN"  "http://www.w3.org/TR/html4/strict.dtd">"#);
    html.push_str(r#"<html lang="en">"#);
    html.push_str(r#"<head><title>"Almanac Report"</title></head>"#);
    html.push_str("<body>");
    html.push_str("<P></P>");
    html.push_str(&format!("<P>Report Date: {}</P>", format_civil(&almanac.report_date)));
    html.push_str(&format!("<P>Report UTC Zone: {}</P>", escape_html(&almanac.utc_zone)));
    html.push_str(&format!("<P>Report Location (Long,Lat): {}</P>", almanac.location));
    html.push_str("<P></P>");

    html.push_str("<P>Solar Info</P>");
    html.push_str("<table BORDER=1>");
    for (label, at) in almanac.solar.rows() {
        push_row(&mut html, label, &format_civil(&at));
    }
    html.push_str("</table>");
    html.push_str("<P></P>");

    html.push_str("<P>Lunar Info</P>");
    html.push_str("<table BORDER=1>");
    for (label, value) in almanac.lunar.rows() {
        push_row(&mut html, label, &value);
    }
    html.push_str("</table>");
    html.push_str("<P></P>");
    html.push_str("</body>");
    html.push_str("</html>");
    html
}

/// Write a fully rendered report.
///
/// The contents are staged in a temporary file next to `path` and moved into
/// place only once fully written, so a failed write leaves nothing behind.
/// With `overwrite` an existing file is replaced. Without it the file must not
/// exist; an existing file is left untouched and the call fails.
pub fn write_report(path: &Path, contents: &str, overwrite: bool) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| AlmanacError::io(path, e))?;
    staged
        .write_all(contents.as_bytes())
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| AlmanacError::io(path, e))?;
    commit(staged, path, overwrite)
}

/// Move a staged report to `path`. On failure the staged file is dropped,
/// which deletes it.
fn commit(staged: NamedTempFile, path: &Path, overwrite: bool) -> Result<()> {
    let persisted = if overwrite {
        staged.persist(path)
    } else {
        staged.persist_noclobber(path)
    };
    persisted.map(|_| ()).map_err(|e| match e.error.kind() {
        ErrorKind::AlreadyExists => AlmanacError::OutputExists(path.to_path_buf()),
        _ => AlmanacError::io(path, e.error),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::almanac::{LunarEvents, MoonPhase, SolarEvents};
    use crate::features::ObserverPoint;
    use crate::zones::UtcOffset;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::fs;
    use tempfile::TempDir;

    fn entries(dir: &TempDir) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2010, 4, 15).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    // A hand-built almanac so rendering tests stay independent of the engine.
    fn sample() -> Almanac {
        Almanac {
            report_date: at(0, 0),
            utc_zone: "(UTC-08:00) Pacific Time (US & Canada)".into(),
            utc_offset: UtcOffset::from_bias_minutes(-480),
            location: ObserverPoint::new(-115.689, 34.428).unwrap(),
            solar: SolarEvents {
                astronomical_twilight_begin: at(4, 1),
                nautical_twilight_begin: at(4, 2),
                civil_twilight_begin: at(4, 3),
                sunrise: at(5, 13),
                solar_transit: at(11, 43),
                sunset: at(18, 13),
                civil_twilight_end: at(18, 40),
                nautical_twilight_end: at(19, 10),
                astronomical_twilight_end: at(19, 42),
            },
            lunar: LunarEvents {
                moonrise: at(5, 50),
                moon_transit: at(12, 30),
                moonset: at(19, 20),
                phase: MoonPhase { illuminated_percent: 0.75 },
                next_new_moon: at(23, 0),
                next_full_moon: at(22, 0),
            },
        }
    }

    #[test]
    fn test_html_header_and_row_order() {
        let html = render_html(&sample());
        assert!(html.starts_with("<!DOCTYPE HTML PUBLIC"));
        assert!(html.contains("<P>Report Date: 2010-04-15 00:00:00</P>"));
        assert!(html.contains("<P>Report UTC Zone: (UTC-08:00) Pacific Time (US &amp; Canada)</P>"));
        assert!(html.contains("<P>Report Location (Long,Lat): -115.689, 34.428</P>"));
        assert!(html.contains("<TR><TD>Sunrise</TD><TD>2010-04-15 05:13:00</TD></TR>"));
        assert!(html.contains("<TR><TD>Moon Phase (%)</TD><TD>0.75% illuminated</TD></TR>"));

        let labels = [
            "Astronomical Twilight Begin", "Nautical Twilight Begin", "Civil Twilight Begin",
            "Sunrise", "Solar Transit", "Sunset",
            "Civil Twilight End", "Nautical Twilight End", "Astronomical Twilight End",
            "Lunar Info",
            "Moonrise", "Moon Transit", "Moonset", "Moon Phase (%)", "Next New Moon", "Next Full Moon",
        ];
        let positions: Vec<usize> = labels
            .iter()
            .map(|l| html.find(&format!(">{}<", l)).unwrap_or_else(|| panic!("missing {l}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(html.matches("<table BORDER=1>").count(), 2);
    }

    #[test]
    fn test_json_render() {
        let json = render_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["utc_zone"], "(UTC-08:00) Pacific Time (US & Canada)");
        assert_eq!(value["solar"]["sunrise"], "2010-04-15T05:13:00");
        assert_eq!(value["utc_offset"]["hours"], -8);
    }

    #[test]
    fn test_write_without_overwrite_refuses_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.html");
        fs::write(&path, "previous").unwrap();

        let err = write_report(&path, "new", false).unwrap_err();
        assert!(matches!(err, AlmanacError::OutputExists(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
        assert_eq!(entries(&dir), ["report.html"]);
    }

    #[test]
    fn test_failed_commit_leaves_no_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.html");
        fs::write(&path, "previous").unwrap();

        let mut staged = NamedTempFile::new_in(dir.path()).unwrap();
        staged.write_all(b"half a rep").unwrap();
        assert!(matches!(commit(staged, &path, false), Err(AlmanacError::OutputExists(_))));

        assert_eq!(entries(&dir), ["report.html"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
    }

    #[test]
    fn test_unwritable_target_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        // The target is an existing directory, so the final move fails.
        let path = dir.path().join("occupied");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        assert!(matches!(write_report(&path, "body", true), Err(AlmanacError::Io { .. })));
        assert_eq!(entries(&dir), ["occupied"]);
    }

    #[test]
    fn test_write_with_overwrite_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.html");
        fs::write(&path, "a much longer previous report body").unwrap();

        write_report(&path, "new", true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_new_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fresh.html");
        write_report(&path, "body", false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "body");

        let missing_dir = dir.path().join("no/such/dir/report.html");
        assert!(matches!(write_report(&missing_dir, "x", true), Err(AlmanacError::Io { .. })));
    }
}
