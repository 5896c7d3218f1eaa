//! Measurement units of a metric.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::InvalidMetricError;

/// Unit of a measured quantity, identified by its short name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Count,
    Percent,
    #[serde(rename = "ms")]
    Milliseconds,
    #[serde(rename = "ns")]
    Nanoseconds,
    #[serde(rename = "sec")]
    Seconds,
    Bytes,
    #[serde(rename = "updown")]
    UpDown,
}

impl Unit {
    pub const ALL: [Unit; 7] = [
        Unit::Count,
        Unit::Percent,
        Unit::Milliseconds,
        Unit::Nanoseconds,
        Unit::Seconds,
        Unit::Bytes,
        Unit::UpDown,
    ];

    pub fn short_name(self) -> &'static str {
        match self {
            Unit::Count => "count",
            Unit::Percent => "percent",
            Unit::Milliseconds => "ms",
            Unit::Nanoseconds => "ns",
            Unit::Seconds => "sec",
            Unit::Bytes => "bytes",
            Unit::UpDown => "updown",
        }
    }

    /// Case-insensitive lookup by short name.
    pub fn from_short_name(name: &str) -> Result<Self, InvalidMetricError> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|u| u.short_name().eq_ignore_ascii_case(name))
            .ok_or_else(|| InvalidMetricError::UnknownUnit(name.to_string()))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Unit {
    type Err = InvalidMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_short_name(s)
    }
}
