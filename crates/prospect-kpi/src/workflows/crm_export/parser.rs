use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::Read;

/// Raw header row and data rows of a delimited export, cells trimmed.
#[derive(Debug, Default)]
pub(crate) struct RawExport {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

pub(crate) fn parse_export<R: Read>(reader: R) -> Result<RawExport, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawExport { headers, rows })
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Parses the timestamp shapes found in HubSpot, Aircall and lemlist exports.
/// Anything unrecognized is treated as absent.
///
/// Slash dates are read day-first (`25/03/2024`), as French exports write
/// them. A month-first value such as `03/25/2024` does not parse, so the row
/// counts as having no timestamp.
pub fn parse_instant(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    parse_day(trimmed).and_then(|day| day.and_hms_opt(0, 0, 0))
}

/// Parses a value carrying a calendar day without a time of day.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}
