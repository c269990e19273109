//! The view pipeline: filter → aggregate → smooth.
//!
//! Each stage is a pure function from table to table; the raw table is
//! never mutated. A full recomputation is cheap (one year of hourly rows
//! at most) and is simply re-run whenever any control input changes.

/// Calendar resampling by arithmetic mean.
pub mod aggregate;
/// Feeder and date-interval selection.
pub mod filter;
/// Trailing moving-average smoothing.
pub mod smooth;

pub use aggregate::aggregate;
pub use filter::filter;
pub use smooth::smooth;

use tracing::debug;

use crate::error::Result;
use crate::series::{DateInterval, Granularity, TimeSeriesTable};

/// Operator control inputs that shape the current view.
///
/// Supplied by the rendering collaborator on every change; the interval is
/// expected pre-clamped to the table's range (`DateInterval::clamp_to`).
#[derive(Debug, Clone)]
pub struct ViewControls {
    /// Selected feeders, at least one, in display order.
    pub feeders: Vec<String>,
    /// Closed date interval of the view.
    pub interval: DateInterval,
    /// Resampling bucket width.
    pub granularity: Granularity,
    /// Trailing moving-average window in rows; 0 disables smoothing.
    pub smoothing_window: usize,
}

/// Runs the three pipeline stages in order and returns the view table.
///
/// # Errors
///
/// Returns `UnknownFeeder` if the controls name a feeder absent from the
/// table. An empty view is a valid result, not an error.
pub fn apply(table: &TimeSeriesTable, controls: &ViewControls) -> Result<TimeSeriesTable> {
    let filtered = filter(table, &controls.feeders, controls.interval)?;
    debug!(rows = filtered.len(), "filtered view");
    let resampled = aggregate(&filtered, controls.granularity)?;
    debug!(rows = resampled.len(), granularity = %controls.granularity, "resampled view");
    let smoothed = smooth(&resampled, controls.smoothing_window)?;
    Ok(smoothed)
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

    #[test]
    fn stages_compose_in_order() {
        let table = TimeSeriesTable::new(
            vec![ts(1, 0), ts(1, 12), ts(2, 0), ts(2, 12), ts(3, 0), ts(3, 12)],
            vec!["A".to_string(), "B".to_string()],
            vec![
                vec![Some(2.0), Some(4.0), Some(6.0), Some(8.0), Some(10.0), Some(12.0)],
                vec![Some(0.0); 6],
            ],
        )
        .unwrap();
        let controls = ViewControls {
            feeders: vec!["A".to_string()],
            interval: DateInterval::new(
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            ),
            granularity: Granularity::Daily,
            smoothing_window: 2,
        };
        let view = apply(&table, &controls).unwrap();
        // Daily means are [3, 7, 11]; a 2-row trailing mean gives
        // [missing, 5, 9].
        assert_eq!(view.feeders(), &["A".to_string()]);
        assert_eq!(view.column("A").unwrap(), &[None, Some(5.0), Some(9.0)]);
    }
}
