//! Per-feeder KPI computation over the current view.

use std::fmt;

use crate::error::{DashError, Result};
use crate::series::TimeSeriesTable;

/// Summary statistics for one feeder over the transformed series.
///
/// Derived data: recomputed whenever the view or the tariff rate changes,
/// never persisted. All values are unrounded; the presentation layer
/// rounds for display.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSet {
    /// Arithmetic mean load (MW) over non-missing values.
    pub average: f64,
    /// Maximum load (MW).
    pub peak: f64,
    /// Minimum load (MW).
    pub minimum: f64,
    /// Sum of non-missing values (MWh under the hourly-bucket convention).
    pub total_energy_mwh: f64,
    /// Average over peak, dimensionless; 0 when peak is 0.
    pub load_factor: f64,
    /// Total energy times the tariff rate.
    pub estimated_cost: f64,
}

/// Computes the metric set for one feeder of the view table.
///
/// Missing values (smoothing warm-up, empty buckets) are excluded from
/// every statistic, not treated as zero.
///
/// # Arguments
///
/// * `table` - The filtered/aggregated/smoothed view
/// * `feeder` - Feeder column name
/// * `tariff_rate` - Cost per MWh, must be non-negative
///
/// # Errors
///
/// Returns `UnknownFeeder` if the column is absent and `EmptySeries` if it
/// holds zero non-missing values; the caller renders a "no data" state
/// for that feeder and continues with the rest of the view.
pub fn compute_metrics(
    table: &TimeSeriesTable,
    feeder: &str,
    tariff_rate: f64,
) -> Result<MetricSet> {
    let column = table.column(feeder)?;
    let values: Vec<f64> = column.iter().flatten().copied().collect();
    if values.is_empty() {
        return Err(DashError::EmptySeries {
            feeder: feeder.to_string(),
        });
    }

    let total: f64 = values.iter().sum();
    let average = total / values.len() as f64;
    let peak = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let minimum = values.iter().copied().fold(f64::INFINITY, f64::min);
    let load_factor = if peak != 0.0 { average / peak } else { 0.0 };

    Ok(MetricSet {
        average,
        peak,
        minimum,
        total_energy_mwh: total,
        load_factor,
        estimated_cost: total * tariff_rate,
    })
}

impl fmt::Display for MetricSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Avg load:      {:.2} MW", self.average)?;
        writeln!(f, "Peak load:     {:.2} MW", self.peak)?;
        writeln!(f, "Min load:      {:.2} MW", self.minimum)?;
        writeln!(f, "Total energy:  {:.2} MWh", self.total_energy_mwh)?;
        writeln!(f, "Load factor:   {:.2}", self.load_factor)?;
        write!(f, "Est. cost:     {:.0}", self.estimated_cost)
    }
}
