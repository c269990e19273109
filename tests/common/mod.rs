//! Shared test fixtures for integration tests.

use chrono::{NaiveDate, NaiveDateTime};
use load_dash::series::TimeSeriesTable;

/// First instant of the fixture dataset (June 1, 2025, midnight).
pub fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Deterministic hourly load shape: a daily sinusoid around `base` MW.
pub fn load_at(base: f64, hour_index: usize) -> f64 {
    let phase = (hour_index % 24) as f64 / 24.0 * std::f64::consts::TAU;
    base + 0.3 * base * phase.sin()
}

/// Builds `days` of hourly data for feeders "North" (base 10 MW) and
/// "South" (base 4 MW).
pub fn hourly_table(days: usize) -> TimeSeriesTable {
    let hours = days * 24;
    let timestamps: Vec<NaiveDateTime> = (0..hours)
        .map(|i| epoch() + chrono::Duration::hours(i as i64))
        .collect();
    let north: Vec<Option<f64>> = (0..hours).map(|i| Some(load_at(10.0, i))).collect();
    let south: Vec<Option<f64>> = (0..hours).map(|i| Some(load_at(4.0, i))).collect();
    TimeSeriesTable::new(
        timestamps,
        vec!["North".to_string(), "South".to_string()],
        vec![north, south],
    )
    .unwrap()
}

/// A small two-feeder CSV with an explicit timestamp column.
pub fn sample_csv() -> String {
    let mut out = String::from("Timestamp,North,South\n");
    for i in 0..72 {
        let ts = epoch() + chrono::Duration::hours(i as i64);
        out.push_str(&format!(
            "{},{},{}\n",
            ts.format("%Y-%m-%d %H:%M:%S"),
            load_at(10.0, i),
            load_at(4.0, i)
        ));
    }
    out
}
