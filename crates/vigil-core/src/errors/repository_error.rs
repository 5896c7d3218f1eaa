//! Series repository errors.

use super::error_code::{self, VigilErrorCode};

/// Errors raised by a [`crate::traits::SeriesRepository`] adapter.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepositoryError {
    #[error("series source unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("query for {series} failed: {reason}")]
    QueryFailed { series: String, reason: String },
}

impl VigilErrorCode for RepositoryError {
    fn error_code(&self) -> &'static str {
        error_code::REPOSITORY_ERROR
    }
}
