//! CSV export of the filtered view.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::series::TimeSeriesTable;

/// Timestamp format written by the exporter.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Exports a view table to a CSV file at the given path.
///
/// Writes a header row (`Timestamp` plus the selected feeder names)
/// followed by one data row per timestamp. Produces deterministic output
/// for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(table: &TimeSeriesTable, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(table, buf)
}

/// Writes a view table as UTF-8 CSV to any writer.
///
/// Missing values serialize as empty fields; numeric values use the
/// shortest round-trip representation, leaving rounding to consumers.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(table: &TimeSeriesTable, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    let mut header = vec!["Timestamp".to_string()];
    header.extend(table.feeders().iter().cloned());
    wtr.write_record(&header)?;

    // Data rows
    for (row, ts) in table.timestamps().iter().enumerate() {
        let mut record = Vec::with_capacity(header.len());
        record.push(ts.format(TIMESTAMP_FORMAT).to_string());
        for column in table.columns() {
            record.push(match column[row] {
                Some(v) => v.to_string(),
                None => String::new(),
            });
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
