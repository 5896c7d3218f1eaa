//! Stable error codes shared by every error type in the workspace.

/// Every error type exposes a stable, machine-readable code.
pub trait VigilErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const INVALID_SERIES: &str = "INVALID_SERIES";
pub const INVALID_METRIC: &str = "INVALID_METRIC";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const REPOSITORY_ERROR: &str = "REPOSITORY_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
