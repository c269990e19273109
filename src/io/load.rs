//! CSV loading into a [`TimeSeriesTable`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::error::{DashError, Result};
use crate::series::TimeSeriesTable;

/// Start of the synthetic hourly index used when the source carries no
/// timestamp column: one row per hour from this instant onward.
pub const SYNTHETIC_EPOCH: NaiveDateTime = match NaiveDate::from_ymd_opt(2025, 6, 1) {
    Some(date) => match date.and_hms_opt(0, 0, 0) {
        Some(ts) => ts,
        None => panic!("invalid synthetic epoch"),
    },
    None => panic!("invalid synthetic epoch"),
};

/// Timestamp formats accepted by the loader, tried in order.
const TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d",
];

/// Loads a feeder-load table from a CSV file.
///
/// # Errors
///
/// Returns `DataFormat` if the file cannot be opened or its contents fail
/// to parse; see [`read_csv`].
pub fn load_csv(path: &Path, timestamp_column: &str) -> Result<TimeSeriesTable> {
    let file = File::open(path).map_err(|e| {
        DashError::data_format(format!("cannot open {}: {e}", path.display()))
    })?;
    let table = read_csv(file, timestamp_column)?;
    info!(
        rows = table.len(),
        feeders = table.feeders().len(),
        path = %path.display(),
        "loaded forecast dataset"
    );
    Ok(table)
}

/// Reads a feeder-load table from any CSV reader.
///
/// The header row names the columns. A column matching `timestamp_column`
/// case-insensitively is parsed as the datetime index; every other column
/// is a feeder. Without a timestamp column, rows get synthetic hourly
/// timestamps starting at [`SYNTHETIC_EPOCH`]. Empty cells load as
/// missing values.
///
/// # Errors
///
/// Returns `DataFormat` when the source is empty, has no feeder columns,
/// holds a non-numeric feeder value or an unparseable timestamp, or when
/// the parsed index is not strictly increasing.
pub fn read_csv(reader: impl Read, timestamp_column: &str) -> Result<TimeSeriesTable> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| DashError::data_format(format!("unreadable header row: {e}")))?
        .clone();

    let ts_index = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(timestamp_column));

    let feeders: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != ts_index)
        .map(|(_, name)| name.to_string())
        .collect();
    if feeders.is_empty() {
        return Err(DashError::data_format("source has no feeder columns"));
    }

    let mut timestamps: Vec<NaiveDateTime> = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = feeders.iter().map(|_| Vec::new()).collect();

    for (row, record) in rdr.records().enumerate() {
        let record =
            record.map_err(|e| DashError::data_format(format!("row {}: {e}", row + 1)))?;

        match ts_index {
            Some(idx) => {
                let raw = record.get(idx).unwrap_or("").trim();
                let ts = parse_timestamp(raw).ok_or_else(|| {
                    DashError::data_format(format!("row {}: unparseable timestamp '{raw}'", row + 1))
                })?;
                timestamps.push(ts);
            }
            None => {
                timestamps.push(SYNTHETIC_EPOCH + chrono::Duration::hours(row as i64));
            }
        }

        let mut col = 0;
        for (i, field) in record.iter().enumerate() {
            if Some(i) == ts_index {
                continue;
            }
            let field = field.trim();
            if field.is_empty() {
                columns[col].push(None);
            } else {
                let value: f64 = field.parse().map_err(|_| {
                    DashError::data_format(format!(
                        "row {}, column '{}': non-numeric value '{field}'",
                        row + 1,
                        feeders[col]
                    ))
                })?;
                columns[col].push(Some(value));
            }
            col += 1;
        }
        if col != feeders.len() {
            return Err(DashError::data_format(format!(
                "row {}: {} fields for {} columns",
                row + 1,
                col,
                feeders.len()
            )));
        }
    }

    if timestamps.is_empty() {
        return Err(DashError::data_format("source contains no data rows"));
    }

    TimeSeriesTable::new(timestamps, feeders, columns)
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }
    // Bare dates carry no time component; anchor them at midnight.
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
