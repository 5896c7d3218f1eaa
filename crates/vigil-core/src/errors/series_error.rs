//! Series identity errors.

use super::error_code::{self, VigilErrorCode};

/// A series string could not be parsed into a [`crate::model::Series`].
///
/// Series strings usually come from partially typed UI state, so callers at
/// the console boundary map this to "no match" instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSeriesError {
    #[error("series must not be empty")]
    Empty,

    #[error("series `{series}` contains an empty segment")]
    EmptySegment { series: String },

    #[error("malformed tag `{tag}` in series `{series}`")]
    MalformedTag { series: String, tag: String },
}

impl VigilErrorCode for InvalidSeriesError {
    fn error_code(&self) -> &'static str {
        error_code::INVALID_SERIES
    }
}
