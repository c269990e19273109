//! Trailing moving-average smoothing, the third pipeline stage.

use crate::error::Result;
use crate::series::TimeSeriesTable;

/// Applies a trailing moving average of `window` rows per feeder.
///
/// Window 0 disables smoothing and returns the input unchanged. For
/// window k > 0, row i becomes the mean of rows `i-k+1 ..= i` only when
/// that trailing window holds k available values; otherwise the output is
/// missing. The first k-1 rows of every feeder are therefore missing
/// (warm-up), and a missing input value propagates a missing output for
/// every window it touches. Consumers must exclude missing values from
/// statistics, never substitute zero.
pub fn smooth(table: &TimeSeriesTable, window: usize) -> Result<TimeSeriesTable> {
    if window == 0 || table.is_empty() {
        return Ok(table.clone());
    }

    let columns = table
        .columns()
        .iter()
        .map(|col| smooth_column(col, window))
        .collect();

    TimeSeriesTable::new(
        table.timestamps().to_vec(),
        table.feeders().to_vec(),
        columns,
    )
}

fn smooth_column(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i + 1 < window {
            out.push(None);
            continue;
        }
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(Option::is_none) {
            out.push(None);
        } else {
            let sum: f64 = slice.iter().flatten().sum();
            out.push(Some(sum / window as f64));
        }
    }
    out
}
