//! Top-level Vigil configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{defaults, AlertConfig, EvaluationConfig, LoggingConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`VIGIL_*`)
/// 3. Project config (`vigil.toml` in the given root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VigilConfig {
    pub evaluation: EvaluationConfig,
    pub alerts: AlertConfig,
    pub logging: LoggingConfig,
}

/// Overrides supplied by the embedding process (highest priority).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub interval_ms: Option<u64>,
    pub max_closed_alerts: Option<usize>,
    pub log_level: Option<String>,
}

impl VigilConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(defaults::CONFIG_FILENAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing and embedding).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &VigilConfig) -> Result<(), ConfigError> {
        if config.evaluation.interval_ms == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "evaluation.interval_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.alerts.max_closed_alerts == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "alerts.max_closed_alerts".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        let level = config.logging.effective_level();
        if !defaults::LOG_LEVELS
            .iter()
            .any(|l| l.eq_ignore_ascii_case(level))
        {
            return Err(ConfigError::ValidationFailed {
                field: "logging.level".to_string(),
                message: format!("must be one of {}", defaults::LOG_LEVELS.join(", ")),
            });
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut VigilConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: VigilConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base` where `other` has a value.
    fn merge(base: &mut VigilConfig, other: &VigilConfig) {
        if other.evaluation.interval_ms.is_some() {
            base.evaluation.interval_ms = other.evaluation.interval_ms;
        }
        if other.evaluation.parallel.is_some() {
            base.evaluation.parallel = other.evaluation.parallel;
        }
        if other.alerts.max_closed_alerts.is_some() {
            base.alerts.max_closed_alerts = other.alerts.max_closed_alerts;
        }
        if other.logging.level.is_some() {
            base.logging.level = other.logging.level.clone();
        }
        if other.logging.json.is_some() {
            base.logging.json = other.logging.json;
        }
    }

    /// Pattern: `VIGIL_EVALUATION_INTERVAL_MS`, `VIGIL_ALERTS_MAX_CLOSED`, ...
    /// Unparseable values are ignored.
    fn apply_env_overrides(config: &mut VigilConfig) {
        if let Ok(val) = std::env::var("VIGIL_EVALUATION_INTERVAL_MS") {
            if let Ok(v) = val.parse::<u64>() {
                config.evaluation.interval_ms = Some(v);
            }
        }
        if let Ok(val) = std::env::var("VIGIL_ALERTS_MAX_CLOSED") {
            if let Ok(v) = val.parse::<usize>() {
                config.alerts.max_closed_alerts = Some(v);
            }
        }
        if let Ok(val) = std::env::var("VIGIL_LOG_LEVEL") {
            config.logging.level = Some(val);
        }
        if let Ok(val) = std::env::var("VIGIL_LOG_JSON") {
            if let Ok(v) = val.parse::<bool>() {
                config.logging.json = Some(v);
            }
        }
    }

    fn apply_overrides(config: &mut VigilConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.interval_ms {
            config.evaluation.interval_ms = Some(v);
        }
        if let Some(v) = overrides.max_closed_alerts {
            config.alerts.max_closed_alerts = Some(v);
        }
        if let Some(ref v) = overrides.log_level {
            config.logging.level = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
