//! Calendar resampling by arithmetic mean, the second pipeline stage.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

use crate::error::Result;
use crate::series::{Granularity, TimeSeriesTable};

/// Resamples a table into calendar buckets of the given granularity.
///
/// Hourly is the identity. Daily, weekly, and monthly replace each bucket
/// with the per-feeder arithmetic mean over the bucket's non-missing
/// values, timestamped at the bucket's representative instant:
///
/// - daily: the bucket's date at midnight
/// - weekly: the week's ending Sunday at midnight (week-end-anchored)
/// - monthly: the last calendar day of the month at midnight
///
/// Buckets with zero source rows are not emitted. A bucket whose values
/// are all missing for some feeder yields a missing value for that feeder
/// while the bucket row itself still appears.
pub fn aggregate(table: &TimeSeriesTable, granularity: Granularity) -> Result<TimeSeriesTable> {
    if granularity == Granularity::Hourly || table.is_empty() {
        return Ok(table.clone());
    }

    let labels: Vec<NaiveDateTime> = table
        .timestamps()
        .iter()
        .map(|ts| bucket_label(ts.date(), granularity))
        .collect();

    // Timestamps are strictly increasing and the label function is
    // monotone, so rows of one bucket are always consecutive.
    let mut bucket_ts = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = table.feeders().iter().map(|_| Vec::new()).collect();

    let mut start = 0;
    while start < labels.len() {
        let mut end = start + 1;
        while end < labels.len() && labels[end] == labels[start] {
            end += 1;
        }
        bucket_ts.push(labels[start]);
        for (col, out) in table.columns().iter().zip(columns.iter_mut()) {
            out.push(mean_of(&col[start..end]));
        }
        start = end;
    }

    TimeSeriesTable::new(bucket_ts, table.feeders().to_vec(), columns)
}

/// Mean over the non-missing values of a slice; `None` when all missing.
fn mean_of(values: &[Option<f64>]) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values.iter().flatten() {
        sum += v;
        count += 1;
    }
    if count == 0 { None } else { Some(sum / count as f64) }
}

/// Representative instant for the bucket containing `date`.
fn bucket_label(date: NaiveDate, granularity: Granularity) -> NaiveDateTime {
    let label_date = match granularity {
        Granularity::Hourly => date,
        Granularity::Daily => date,
        Granularity::Weekly => {
            // Days remaining until the week's ending Sunday (Mon=6 .. Sun=0).
            let to_sunday = 6 - u64::from(date.weekday().num_days_from_monday());
            date + Days::new(to_sunday)
        }
        Granularity::Monthly => last_day_of_month(date),
    };
    label_date.and_hms_opt(0, 0, 0).unwrap_or_default()
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first_of_next| first_of_next - Days::new(1))
        .unwrap_or(date)
}
