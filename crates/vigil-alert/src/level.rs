//! Severity levels of a watch, ordered `Green < Amber < Red`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vigil_core::WatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Green,
    Amber,
    Red,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Green => "green",
            Level::Amber => "amber",
            Level::Red => "red",
        }
    }

    /// Only amber and red raise alerts; green is the baseline.
    pub fn is_alerting(self) -> bool {
        self > Level::Green
    }

    pub fn parse(level: &str) -> Result<Self, WatchError> {
        match level.trim().to_ascii_lowercase().as_str() {
            "green" => Ok(Level::Green),
            "amber" => Ok(Level::Amber),
            "red" => Ok(Level::Red),
            other => Err(WatchError::Validation(format!("unknown level `{other}`"))),
        }
    }
}

/// Display helper for an optional level; `None` is "no level".
pub fn level_name(level: Option<Level>) -> &'static str {
    level.map_or("none", Level::as_str)
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
