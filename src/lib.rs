//! Data-processing core of the hourly energy-load forecast dashboard.
//!
//! One year of hourly feeder loads flows through a linear pipeline:
//! load once, then filter, resample, and smooth per view change, and
//! derive KPIs, anomaly flags, and seasonality groupings from the result.

/// Standard-score anomaly flagging.
pub mod anomaly;
pub mod config;
pub mod error;
/// CSV load and export at the pipeline boundary.
pub mod io;
pub mod metrics;
/// The filter → aggregate → smooth view pipeline.
pub mod pipeline;
pub mod seasonality;
pub mod series;
