//! Metric errors.

use super::error_code::{self, VigilErrorCode};
use super::InvalidSeriesError;

/// A metric (series + unit) could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMetricError {
    #[error("invalid metric series: {0}")]
    Series(#[from] InvalidSeriesError),

    #[error("unknown unit `{0}`")]
    UnknownUnit(String),
}

impl VigilErrorCode for InvalidMetricError {
    fn error_code(&self) -> &'static str {
        error_code::INVALID_METRIC
    }
}
