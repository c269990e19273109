//! Seasonality groupings: distribution buckets and the hour-month pivot.
//!
//! These feed the single-feeder distribution and heatmap views. They are
//! computed over whatever table the caller passes; the dashboard applies
//! them to the raw table so the seasonal shape is not distorted by the
//! view's resampling.

use chrono::{Datelike, Timelike};

use crate::error::Result;
use crate::series::TimeSeriesTable;

/// Month display names in calendar order, matching `by_month` indices.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Weekday display names Monday-first, matching `by_weekday` indices.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// A feeder's non-missing values grouped by calendar month and weekday.
///
/// Backing data for the monthly and weekly distribution boxplots.
#[derive(Debug, Clone)]
pub struct SeasonalBuckets {
    /// Feeder the buckets cover.
    pub feeder: String,
    /// Values per month, index 0 = January.
    pub by_month: [Vec<f64>; 12],
    /// Values per weekday, index 0 = Monday.
    pub by_weekday: [Vec<f64>; 7],
}

/// Groups a feeder's non-missing values by month and weekday.
///
/// # Errors
///
/// Returns `UnknownFeeder` if the column is absent.
pub fn seasonal_buckets(table: &TimeSeriesTable, feeder: &str) -> Result<SeasonalBuckets> {
    let column = table.column(feeder)?;
    let mut by_month: [Vec<f64>; 12] = std::array::from_fn(|_| Vec::new());
    let mut by_weekday: [Vec<f64>; 7] = std::array::from_fn(|_| Vec::new());

    for (ts, value) in table.timestamps().iter().zip(column) {
        if let Some(v) = value {
            by_month[ts.month0() as usize].push(*v);
            by_weekday[ts.weekday().num_days_from_monday() as usize].push(*v);
        }
    }

    Ok(SeasonalBuckets {
        feeder: feeder.to_string(),
        by_month,
        by_weekday,
    })
}

/// Mean load per (hour-of-day, month) cell for one feeder.
///
/// Backing data for the hour-vs-month heatmap. Cells with no observations
/// are `None`.
#[derive(Debug, Clone)]
pub struct HeatmapPivot {
    /// Feeder the pivot covers.
    pub feeder: String,
    /// `cells[hour][month0]`, hour 0–23, month0 0 = January.
    pub cells: [[Option<f64>; 12]; 24],
}

/// Pivots a feeder's values into hour-of-day × month mean cells.
///
/// # Errors
///
/// Returns `UnknownFeeder` if the column is absent.
pub fn heatmap_pivot(table: &TimeSeriesTable, feeder: &str) -> Result<HeatmapPivot> {
    let column = table.column(feeder)?;
    let mut sums = [[0.0f64; 12]; 24];
    let mut counts = [[0usize; 12]; 24];

    for (ts, value) in table.timestamps().iter().zip(column) {
        if let Some(v) = value {
            let hour = ts.hour() as usize;
            let month = ts.month0() as usize;
            sums[hour][month] += v;
            counts[hour][month] += 1;
        }
    }

    let mut cells = [[None; 12]; 24];
    for hour in 0..24 {
        for month in 0..12 {
            if counts[hour][month] > 0 {
                cells[hour][month] = Some(sums[hour][month] / counts[hour][month] as f64);
            }
        }
    }

    Ok(HeatmapPivot {
        feeder: feeder.to_string(),
        cells,
    })
}
