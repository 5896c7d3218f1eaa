//! Watch registry errors.

use super::error_code::{self, VigilErrorCode};

/// Errors surfaced by watch and alert registry operations.
///
/// Neither variant is fatal: a validation error rejects the operation, a
/// not-found error means the operation had no effect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WatchError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("watch not found: {0}")]
    NotFound(String),
}

impl VigilErrorCode for WatchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => error_code::VALIDATION_ERROR,
            Self::NotFound(_) => error_code::NOT_FOUND,
        }
    }
}
