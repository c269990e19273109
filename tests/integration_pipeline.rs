//! Integration tests for the filter → aggregate → smooth pipeline.

mod common;

use chrono::NaiveDate;
use load_dash::pipeline::{self, ViewControls};
use load_dash::series::{DateInterval, Granularity};

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, d).unwrap()
}

fn controls(granularity: Granularity, window: usize) -> ViewControls {
    ViewControls {
        feeders: vec!["North".to_string()],
        interval: DateInterval::new(date(6, 1), date(6, 30)),
        granularity,
        smoothing_window: window,
    }
}

#[test]
fn hourly_view_keeps_every_row_in_interval() {
    let table = common::hourly_table(30);
    let view = pipeline::apply(&table, &controls(Granularity::Hourly, 0)).unwrap();
    assert_eq!(view.len(), 30 * 24);
    assert_eq!(view.feeders(), &["North".to_string()]);
}

#[test]
fn daily_view_emits_one_bucket_per_day() {
    let table = common::hourly_table(30);
    let view = pipeline::apply(&table, &controls(Granularity::Daily, 0)).unwrap();
    assert_eq!(view.len(), 30);
    // Every day carries the same sinusoid, so every daily mean is the
    // mean of one full cycle.
    let expected: f64 = (0..24).map(|h| common::load_at(10.0, h)).sum::<f64>() / 24.0;
    for value in view.column("North").unwrap() {
        assert!((value.unwrap() - expected).abs() < 1e-9);
    }
}

#[test]
fn daily_mean_over_month_matches_hourly_mean() {
    let table = common::hourly_table(30);
    let hourly = pipeline::apply(&table, &controls(Granularity::Hourly, 0)).unwrap();
    let daily = pipeline::apply(&table, &controls(Granularity::Daily, 0)).unwrap();

    let mean = |values: &[Option<f64>]| {
        let kept: Vec<f64> = values.iter().flatten().copied().collect();
        kept.iter().sum::<f64>() / kept.len() as f64
    };
    let hourly_mean = mean(hourly.column("North").unwrap());
    let daily_mean = mean(daily.column("North").unwrap());
    assert!((hourly_mean - daily_mean).abs() < 1e-9);
}

#[test]
fn weekly_buckets_land_on_sundays() {
    let table = common::hourly_table(14);
    let view = pipeline::apply(&table, &controls(Granularity::Weekly, 0)).unwrap();
    for ts in view.timestamps() {
        assert_eq!(ts.format("%A").to_string(), "Sunday");
    }
}

#[test]
fn monthly_view_of_one_month_is_a_single_bucket() {
    let table = common::hourly_table(30);
    let view = pipeline::apply(&table, &controls(Granularity::Monthly, 0)).unwrap();
    assert_eq!(view.len(), 1);
    assert_eq!(view.timestamps()[0].date(), date(6, 30));
}

#[test]
fn smoothing_after_aggregation_blanks_warm_up_buckets() {
    let table = common::hourly_table(10);
    let view = pipeline::apply(&table, &controls(Granularity::Daily, 3)).unwrap();
    let col = view.column("North").unwrap();
    assert_eq!(view.len(), 10);
    assert_eq!(col[0], None);
    assert_eq!(col[1], None);
    assert!(col[2].is_some());
}

#[test]
fn narrowed_interval_drops_outside_days() {
    let table = common::hourly_table(30);
    let narrow = ViewControls {
        interval: DateInterval::new(date(6, 10), date(6, 12)),
        ..controls(Granularity::Hourly, 0)
    };
    let view = pipeline::apply(&table, &narrow).unwrap();
    assert_eq!(view.len(), 3 * 24);
    assert_eq!(view.timestamps()[0].date(), date(6, 10));
    assert_eq!(view.timestamps().last().unwrap().date(), date(6, 12));
}

#[test]
fn unknown_feeder_propagates_from_filter() {
    let table = common::hourly_table(2);
    let bad = ViewControls {
        feeders: vec!["West".to_string()],
        ..controls(Granularity::Hourly, 0)
    };
    assert!(pipeline::apply(&table, &bad).is_err());
}
