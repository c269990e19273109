//! Error types shared across the pipeline.

use thiserror::Error;

/// Convenience alias used by every fallible pipeline operation.
pub type Result<T> = std::result::Result<T, DashError>;

/// Errors surfaced by the forecast-dashboard core.
///
/// `DataFormat` is fatal at load time and aborts startup. `UnknownFeeder`
/// and `EmptySeries` are surfaced to the calling collaborator, which
/// decides whether to present a degraded view or halt; neither is retried.
#[derive(Debug, Error)]
pub enum DashError {
    /// The tabular source is empty, unreadable, non-numeric, or its
    /// timestamp index is not strictly increasing.
    #[error("malformed source data: {reason}")]
    DataFormat { reason: String },

    /// A requested feeder column does not exist in the table.
    #[error("unknown feeder: {name}")]
    UnknownFeeder { name: String },

    /// A feeder has zero non-missing values in the current filtered view.
    /// Rendered as a "no data available" state, not a crash.
    #[error("no data available for feeder '{feeder}' in the current view")]
    EmptySeries { feeder: String },
}

impl DashError {
    /// Shorthand for a `DataFormat` error with a formatted reason.
    pub fn data_format(reason: impl Into<String>) -> Self {
        Self::DataFormat {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DashError;

    #[test]
    fn display_names_the_missing_feeder() {
        let err = DashError::UnknownFeeder {
            name: "Feeder_7".to_string(),
        };
        assert_eq!(err.to_string(), "unknown feeder: Feeder_7");
    }

    #[test]
    fn empty_series_reads_as_no_data_condition() {
        let err = DashError::EmptySeries {
            feeder: "Total_MW".to_string(),
        };
        assert!(err.to_string().contains("no data available"));
    }
}
