//! TOML-based dashboard configuration and control-input resolution.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::pipeline::ViewControls;
use crate::series::{DateInterval, Granularity, TimeSeriesTable};

/// Top-level dashboard configuration parsed from TOML.
///
/// All fields have defaults matching the original dashboard's startup
/// state. Load from TOML with [`DashboardConfig::from_toml_file`] or use
/// `DashboardConfig::default()` and override fields from the CLI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Source dataset location and schema.
    pub dataset: DatasetConfig,
    /// Default control inputs for the view pipeline.
    pub controls: ControlsConfig,
}

/// Source dataset location and schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetConfig {
    /// Path to the forecast CSV.
    pub path: String,
    /// Name of the timestamp column, matched case-insensitively.
    pub timestamp_column: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: "forecast.csv".to_string(),
            timestamp_column: "Timestamp".to_string(),
        }
    }
}

/// Default control inputs for the view pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlsConfig {
    /// Selected feeders; empty selects every feeder in the dataset.
    pub feeders: Vec<String>,
    /// Feeder driving single-feeder views (anomalies, seasonality,
    /// heatmap). Defaults to the first selected feeder.
    pub primary_feeder: Option<String>,
    /// First date of the view; defaults to the dataset's first date.
    pub start_date: Option<NaiveDate>,
    /// Last date of the view; defaults to the dataset's last date.
    pub end_date: Option<NaiveDate>,
    /// Resampling bucket width.
    pub granularity: Granularity,
    /// Trailing moving-average window in rows; 0 disables smoothing.
    pub smoothing_window: usize,
    /// Tariff rate per MWh for the cost estimate.
    pub tariff_rate: f64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            feeders: Vec::new(),
            primary_feeder: None,
            start_date: None,
            end_date: None,
            granularity: Granularity::Hourly,
            smoothing_window: 0,
            tariff_rate: 65.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"controls.tariff_rate"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl DashboardConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let c = &self.controls;

        if c.tariff_rate < 0.0 || !c.tariff_rate.is_finite() {
            errors.push(ConfigError {
                field: "controls.tariff_rate".into(),
                message: format!("must be a non-negative number, got {}", c.tariff_rate),
            });
        }
        if let (Some(start), Some(end)) = (c.start_date, c.end_date)
            && start > end
        {
            errors.push(ConfigError {
                field: "controls.start_date".into(),
                message: format!("start {start} is after end {end}"),
            });
        }
        if self.dataset.path.is_empty() {
            errors.push(ConfigError {
                field: "dataset.path".into(),
                message: "must not be empty".into(),
            });
        }
        if self.dataset.timestamp_column.is_empty() {
            errors.push(ConfigError {
                field: "dataset.timestamp_column".into(),
                message: "must not be empty".into(),
            });
        }

        errors
    }
}

impl ControlsConfig {
    /// Resolves the configured defaults against a loaded table into
    /// concrete pipeline controls plus the primary feeder.
    ///
    /// Empty feeder selection expands to every dataset feeder; absent
    /// dates default to the table's range; the requested interval is
    /// clamped to that range before the pipeline sees it.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the table is empty, the dates are
    /// reversed, or the interval lies entirely outside the table's range.
    pub fn resolve(&self, table: &TimeSeriesTable) -> Result<(ViewControls, String), ConfigError> {
        let (min, max) = match (table.min_date(), table.max_date()) {
            (Some(min), Some(max)) => (min, max),
            _ => {
                return Err(ConfigError {
                    field: "dataset.path".into(),
                    message: "dataset holds no rows".into(),
                });
            }
        };

        let start = self.start_date.unwrap_or(min);
        let end = self.end_date.unwrap_or(max);
        if start > end {
            return Err(ConfigError {
                field: "controls.start_date".into(),
                message: format!("start {start} is after end {end}"),
            });
        }
        let interval = DateInterval::new(start, end)
            .clamp_to(table)
            .ok_or_else(|| ConfigError {
                field: "controls.start_date".into(),
                message: format!("interval {start}..{end} lies outside the dataset range"),
            })?;

        let feeders = if self.feeders.is_empty() {
            table.feeders().to_vec()
        } else {
            self.feeders.clone()
        };

        let primary = match &self.primary_feeder {
            Some(name) => name.clone(),
            // Selection is non-empty: either configured or expanded from
            // the dataset, which the loader guarantees has >= 1 feeder.
            None => feeders[0].clone(),
        };

        Ok((
            ViewControls {
                feeders,
                interval,
                granularity: self.granularity,
                smoothing_window: self.smoothing_window,
            },
            primary,
        ))
    }
}
