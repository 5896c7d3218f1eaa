//! Console error type aggregating the subsystem errors.

use vigil_core::errors::{error_code, VigilErrorCode};
use vigil_core::{InvalidMetricError, RepositoryError, WatchError};

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Watch(#[from] WatchError),

    #[error("invalid metric: {0}")]
    InvalidMetric(#[from] InvalidMetricError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl VigilErrorCode for ConsoleError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Watch(e) => e.error_code(),
            Self::InvalidMetric(_) => error_code::INVALID_METRIC,
            Self::Repository(e) => e.error_code(),
        }
    }
}
