//! Configuration system for Vigil.
//! TOML-based, layered resolution: overrides > env > project file > defaults.

pub mod alert_config;
pub mod defaults;
pub mod evaluation_config;
pub mod logging_config;
pub mod vigil_config;

pub use alert_config::AlertConfig;
pub use evaluation_config::EvaluationConfig;
pub use logging_config::LoggingConfig;
pub use vigil_config::{ConfigOverrides, VigilConfig};
