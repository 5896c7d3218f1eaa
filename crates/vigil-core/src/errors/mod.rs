//! Error handling for Vigil.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod metric_error;
pub mod repository_error;
pub mod series_error;
pub mod watch_error;

pub use config_error::ConfigError;
pub use error_code::VigilErrorCode;
pub use metric_error::InvalidMetricError;
pub use repository_error::RepositoryError;
pub use series_error::InvalidSeriesError;
pub use watch_error::WatchError;
