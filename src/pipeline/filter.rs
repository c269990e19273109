//! Feeder and date-interval selection, the first pipeline stage.

use crate::error::Result;
use crate::series::{DateInterval, TimeSeriesTable};

/// Restricts a table to the given feeders and closed date interval.
///
/// Column order in the output follows the requested feeder order, not the
/// source order. Row inclusion is a date-only comparison: a row at any
/// time-of-day on the start or end date is kept. Interval bounds must be
/// clamped to the table's range by the caller (`DateInterval::clamp_to`);
/// this stage does not clamp.
///
/// An interval that matches no rows yields an empty table, not an error;
/// downstream metric computation reports the empty-view condition itself.
///
/// # Errors
///
/// Returns `UnknownFeeder` if any requested feeder is absent from the
/// table.
pub fn filter(
    table: &TimeSeriesTable,
    feeders: &[String],
    interval: DateInterval,
) -> Result<TimeSeriesTable> {
    let mut indices = Vec::with_capacity(feeders.len());
    for name in feeders {
        indices.push(table.feeder_index(name)?);
    }

    let kept: Vec<usize> = table
        .timestamps()
        .iter()
        .enumerate()
        .filter(|(_, ts)| interval.contains(ts.date()))
        .map(|(row, _)| row)
        .collect();

    if kept.is_empty() {
        return Ok(TimeSeriesTable::empty(feeders.to_vec()));
    }

    let timestamps = kept.iter().map(|&row| table.timestamps()[row]).collect();
    let columns = indices
        .iter()
        .map(|&col| {
            let source = &table.columns()[col];
            kept.iter().map(|&row| source[row]).collect()
        })
        .collect();

    TimeSeriesTable::new(timestamps, feeders.to_vec(), columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn sample_table() -> TimeSeriesTable {
        TimeSeriesTable::new(
            vec![ts(1, 0), ts(1, 23), ts(2, 12), ts(3, 0)],
            vec!["A".to_string(), "B".to_string()],
            vec![
                vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
                vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn keeps_any_time_of_day_on_boundary_dates() {
        let table = sample_table();
        let out = filter(
            &table,
            &["A".to_string()],
            DateInterval::new(date(1), date(1)),
        )
        .unwrap();
        // Both the midnight row and the 23:00 row on June 1 are inside.
        assert_eq!(out.len(), 2);
        assert_eq!(out.column("A").unwrap(), &[Some(1.0), Some(2.0)]);
    }

    #[test]
    fn unknown_feeder_is_an_error() {
        let table = sample_table();
        let err = filter(
            &table,
            &["Z".to_string()],
            DateInterval::new(date(1), date(3)),
        );
        assert!(err.is_err());
    }

    #[test]
    fn column_order_follows_request() {
        let table = sample_table();
        let out = filter(
            &table,
            &["B".to_string(), "A".to_string()],
            DateInterval::new(date(1), date(3)),
        )
        .unwrap();
        assert_eq!(out.feeders(), &["B".to_string(), "A".to_string()]);
    }

    #[test]
    fn no_matching_rows_yields_empty_table() {
        let table = sample_table();
        // Rows exist only on June 1-3; June 4 matches nothing but is a
        // valid (unclamped-by-us) request.
        let out = filter(
            &table,
            &["A".to_string()],
            DateInterval::new(date(4), date(4)),
        )
        .unwrap();
        assert!(out.is_empty());
        assert_eq!(out.feeders(), &["A".to_string()]);
    }

    #[test]
    fn refiltering_with_same_args_is_idempotent() {
        let table = sample_table();
        let feeders = vec!["A".to_string()];
        let once = filter(&table, &feeders, DateInterval::new(date(1), date(2))).unwrap();
        // Same feeder set, superset interval: must reproduce the same rows.
        let twice = filter(&once, &feeders, DateInterval::new(date(1), date(3))).unwrap();
        assert_eq!(once.timestamps(), twice.timestamps());
        assert_eq!(once.column("A").unwrap(), twice.column("A").unwrap());
    }
}
