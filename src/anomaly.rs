//! Standard-score anomaly flagging over the current view.

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::series::TimeSeriesTable;

/// Absolute standard-score threshold beyond which a point is flagged.
pub const Z_THRESHOLD: f64 = 3.0;

/// One flagged point of a feeder's series.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyPoint {
    /// Row timestamp in the view table.
    pub timestamp: NaiveDateTime,
    /// Load value at that row (MW).
    pub value: f64,
    /// Standard score that triggered the flag.
    pub z_score: f64,
}

/// Flagged outliers for one feeder, in original timestamp order.
///
/// Derived on demand from the view table. A degenerate series (constant,
/// or fewer than two non-missing points) has no statistically meaningful
/// outliers and yields an empty report rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyReport {
    /// Feeder the report covers.
    pub feeder: String,
    /// Sample mean over non-missing values; 0 for an empty series.
    pub mean: f64,
    /// Sample standard deviation (N−1 denominator); 0 when undefined.
    pub std_dev: f64,
    /// Flagged points where |z| exceeds [`Z_THRESHOLD`].
    pub points: Vec<AnomalyPoint>,
}

impl AnomalyReport {
    /// True when no point was flagged.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Flags points of `feeder` whose standard score exceeds ±[`Z_THRESHOLD`].
///
/// The score uses the sample mean and sample standard deviation (N−1
/// denominator) over the feeder's non-missing values in the view, which
/// is deliberately the transformed series, not the raw hourly one. Missing
/// values neither contribute to the statistics nor get flagged.
///
/// # Errors
///
/// Returns `UnknownFeeder` if the column is absent. Degenerate series are
/// not errors; they produce an empty report.
pub fn detect_anomalies(table: &TimeSeriesTable, feeder: &str) -> Result<AnomalyReport> {
    let column = table.column(feeder)?;
    let values: Vec<(NaiveDateTime, f64)> = table
        .timestamps()
        .iter()
        .zip(column)
        .filter_map(|(ts, v)| v.map(|v| (*ts, v)))
        .collect();

    let n = values.len();
    if n < 2 {
        return Ok(AnomalyReport {
            feeder: feeder.to_string(),
            mean: values.first().map_or(0.0, |(_, v)| *v),
            std_dev: 0.0,
            points: Vec::new(),
        });
    }

    let mean = values.iter().map(|(_, v)| v).sum::<f64>() / n as f64;
    let sq_sum: f64 = values.iter().map(|(_, v)| (v - mean).powi(2)).sum();
    let std_dev = (sq_sum / (n - 1) as f64).sqrt();

    let points = if std_dev == 0.0 {
        // Constant series: z is undefined for every point.
        Vec::new()
    } else {
        values
            .iter()
            .filter_map(|&(timestamp, value)| {
                let z_score = (value - mean) / std_dev;
                (z_score.abs() > Z_THRESHOLD).then_some(AnomalyPoint {
                    timestamp,
                    value,
                    z_score,
                })
            })
            .collect()
    };

    Ok(AnomalyReport {
        feeder: feeder.to_string(),
        mean,
        std_dev,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hourly(n: usize) -> Vec<NaiveDateTime> {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::hours(i as i64))
            .collect()
    }

    fn one_feeder(values: Vec<Option<f64>>) -> TimeSeriesTable {
        TimeSeriesTable::new(hourly(values.len()), vec!["A".to_string()], vec![values]).unwrap()
    }

    #[test]
    fn constant_series_yields_empty_report() {
        let table = one_feeder(vec![Some(5.0); 10]);
        let report = detect_anomalies(&table, "A").unwrap();
        assert_eq!(report.std_dev, 0.0);
        assert!(report.is_empty());
    }

    #[test]
    fn fewer_than_two_points_yields_empty_report() {
        let table = one_feeder(vec![Some(5.0), None, None]);
        let report = detect_anomalies(&table, "A").unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn single_spike_below_threshold_is_not_flagged() {
        // [1, 1, 1, 1, 100]: mean 20.8, sample std ~44.27, z(100) ~1.79.
        // The threshold of 3 is conservative; intuition says "obvious
        // outlier" but the formula disagrees, so the report stays empty.
        let table = one_feeder(vec![Some(1.0), Some(1.0), Some(1.0), Some(1.0), Some(100.0)]);
        let report = detect_anomalies(&table, "A").unwrap();

        assert!((report.mean - 20.8).abs() < 1e-12);
        let expected_std = (7840.8_f64 / 4.0).sqrt();
        assert!((report.std_dev - expected_std).abs() < 1e-9);

        let z_100 = (100.0 - report.mean) / report.std_dev;
        assert!((z_100 - (100.0 - 20.8) / expected_std).abs() < 1e-12);
        assert!(z_100 < Z_THRESHOLD);
        assert!(report.is_empty());
    }

    #[test]
    fn extreme_point_in_long_series_is_flagged() {
        // 50 alternating baseline points around 10 plus one far spike.
        let mut values: Vec<Option<f64>> = (0..50)
            .map(|i| Some(if i % 2 == 0 { 9.0 } else { 11.0 }))
            .collect();
        values.push(Some(500.0));
        let table = one_feeder(values);
        let report = detect_anomalies(&table, "A").unwrap();
        assert_eq!(report.points.len(), 1);
        assert_eq!(report.points[0].value, 500.0);
        assert!(report.points[0].z_score > Z_THRESHOLD);
    }

    #[test]
    fn flagged_points_preserve_timestamp_order() {
        let mut values: Vec<Option<f64>> = vec![Some(-500.0)];
        values.extend((0..60).map(|i| Some(if i % 2 == 0 { 9.0 } else { 11.0 })));
        values.push(Some(500.0));
        let table = one_feeder(values);
        let report = detect_anomalies(&table, "A").unwrap();
        assert_eq!(report.points.len(), 2);
        assert!(report.points[0].timestamp < report.points[1].timestamp);
        assert_eq!(report.points[0].value, -500.0);
    }

    #[test]
    fn missing_values_do_not_shift_statistics() {
        let with_gaps = one_feeder(vec![Some(1.0), None, Some(3.0), None, Some(5.0)]);
        let dense = one_feeder(vec![Some(1.0), Some(3.0), Some(5.0)]);
        let a = detect_anomalies(&with_gaps, "A").unwrap();
        let b = detect_anomalies(&dense, "A").unwrap();
        assert_eq!(a.mean, b.mean);
        assert_eq!(a.std_dev, b.std_dev);
    }
}
