//! Core data model: the timestamped feeder-load table and its index types.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::{DashError, Result};

/// An immutable table of hourly (or resampled) load values.
///
/// Rows are indexed by strictly increasing timestamps; each feeder is a
/// named numeric column stored column-major. Missing values (smoothing
/// warm-up, empty resample buckets) are `None`, never NaN, so downstream
/// statistics can skip them without sentinel checks.
///
/// The raw table is loaded once and treated as immutable; every pipeline
/// stage consumes a table by reference and produces a new one.
#[derive(Debug, Clone)]
pub struct TimeSeriesTable {
    timestamps: Vec<NaiveDateTime>,
    feeders: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

impl TimeSeriesTable {
    /// Creates a table from parallel timestamp and column vectors.
    ///
    /// # Arguments
    ///
    /// * `timestamps` - Row index, one entry per row
    /// * `feeders` - Column names, one per column
    /// * `columns` - Column-major values; `columns[c].len()` must equal
    ///   `timestamps.len()` for every `c`
    ///
    /// # Errors
    ///
    /// Returns `DataFormat` if the timestamps are not strictly increasing,
    /// if a column length disagrees with the row count, or if the column
    /// count disagrees with the feeder-name count.
    pub fn new(
        timestamps: Vec<NaiveDateTime>,
        feeders: Vec<String>,
        columns: Vec<Vec<Option<f64>>>,
    ) -> Result<Self> {
        if feeders.len() != columns.len() {
            return Err(DashError::data_format(format!(
                "{} feeder names but {} columns",
                feeders.len(),
                columns.len()
            )));
        }
        for (name, column) in feeders.iter().zip(&columns) {
            if column.len() != timestamps.len() {
                return Err(DashError::data_format(format!(
                    "column '{}' has {} values for {} timestamps",
                    name,
                    column.len(),
                    timestamps.len()
                )));
            }
        }
        for pair in timestamps.windows(2) {
            if pair[1] <= pair[0] {
                return Err(DashError::data_format(format!(
                    "timestamp index not strictly increasing at {}",
                    pair[1]
                )));
            }
        }
        Ok(Self {
            timestamps,
            feeders,
            columns,
        })
    }

    /// Creates an empty table that keeps the given feeder columns.
    ///
    /// Used by the filter stage when no row falls inside the requested
    /// interval; an empty view is a valid state, not an error.
    pub fn empty(feeders: Vec<String>) -> Self {
        let columns = feeders.iter().map(|_| Vec::new()).collect();
        Self {
            timestamps: Vec::new(),
            feeders,
            columns,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// True when the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Row index, strictly increasing.
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Feeder column names, in source order.
    pub fn feeders(&self) -> &[String] {
        &self.feeders
    }

    /// Position of a feeder column.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFeeder` if no column carries that name.
    pub fn feeder_index(&self, name: &str) -> Result<usize> {
        self.feeders
            .iter()
            .position(|f| f == name)
            .ok_or_else(|| DashError::UnknownFeeder {
                name: name.to_string(),
            })
    }

    /// A feeder's values in row order.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFeeder` if no column carries that name.
    pub fn column(&self, name: &str) -> Result<&[Option<f64>]> {
        let idx = self.feeder_index(name)?;
        Ok(&self.columns[idx])
    }

    /// All columns in feeder order, column-major.
    pub fn columns(&self) -> &[Vec<Option<f64>>] {
        &self.columns
    }

    /// Calendar date of the first row, if any.
    pub fn min_date(&self) -> Option<NaiveDate> {
        self.timestamps.first().map(|ts| ts.date())
    }

    /// Calendar date of the last row, if any.
    pub fn max_date(&self) -> Option<NaiveDate> {
        self.timestamps.last().map(|ts| ts.date())
    }
}

/// A closed calendar-date interval used for view filtering.
///
/// A row at any time-of-day on the start or end date is considered inside
/// the interval (date-only comparison).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterval {
    /// First included date.
    pub start: NaiveDate,
    /// Last included date.
    pub end: NaiveDate,
}

impl DateInterval {
    /// Creates a closed interval.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`. Callers taking dates from user input must
    /// validate ordering before constructing the interval.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        assert!(start <= end, "date interval start must not exceed end");
        Self { start, end }
    }

    /// True when the date falls inside the closed interval.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Clamps both bounds to the table's actual date range.
    ///
    /// The filter stage expects pre-clamped bounds; this is the helper the
    /// calling collaborator uses before invoking it. Returns `None` for an
    /// empty table, where no meaningful range exists.
    pub fn clamp_to(&self, table: &TimeSeriesTable) -> Option<Self> {
        let min = table.min_date()?;
        let max = table.max_date()?;
        if self.end < min || self.start > max {
            // Interval lies entirely outside the table range.
            return None;
        }
        Some(Self {
            start: self.start.clamp(min, max),
            end: self.end.clamp(min, max),
        })
    }
}

/// Resampling bucket width for the aggregation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// No resampling; the table passes through unchanged.
    Hourly,
    /// Calendar-day buckets, day boundaries at midnight.
    Daily,
    /// Calendar-week buckets ending on Sunday.
    Weekly,
    /// Calendar-month buckets.
    Monthly,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Hourly => "hourly",
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hourly" => Ok(Granularity::Hourly),
            "daily" => Ok(Granularity::Daily),
            "weekly" => Ok(Granularity::Weekly),
            "monthly" => Ok(Granularity::Monthly),
            other => Err(format!(
                "unknown granularity '{other}' (expected hourly, daily, weekly, or monthly)"
            )),
        }
    }
}
