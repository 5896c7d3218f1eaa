//! [`Metric`]: A measured quantity, the series plus its unit.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Series, Unit};
use crate::errors::InvalidMetricError;

/// Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metric {
    pub series: Series,
    pub unit: Unit,
}

impl Metric {
    pub fn new(series: Series, unit: Unit) -> Self {
        Self { series, unit }
    }

    /// Parse a metric from a series string and an optional unit short name.
    /// A missing or blank unit defaults to [`Unit::Count`].
    pub fn parse(series: &str, unit: Option<&str>) -> Result<Self, InvalidMetricError> {
        let series = Series::parse(series)?;
        let unit = match unit.map(str::trim) {
            None | Some("") => Unit::default(),
            Some(u) => Unit::from_short_name(u)?,
        };
        Ok(Self { series, unit })
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.series, self.unit)
    }
}
