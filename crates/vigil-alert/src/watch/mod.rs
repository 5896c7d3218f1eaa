//! [`Watch`]: A named alerting rule bound to one metric.

pub mod ring;
pub mod state;

use serde::Serialize;
use vigil_core::{Metric, Series, WatchError};

use crate::circumstance::Circumstance;
use crate::condition::Retention;
use crate::level::Level;

pub use ring::{SampleRing, MAX_RING_SAMPLES};
pub use state::{LevelChange, WatchState};

/// Watch definition. The evaluation state lives in the service, keyed by
/// the watch, so a `Watch` is a plain immutable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Watch {
    name: String,
    metric: Metric,
    disabled: bool,
    red: Circumstance,
    amber: Circumstance,
    green: Circumstance,
}

impl Watch {
    /// Validate and build a watch.
    ///
    /// The name must not be blank, at least one of red or amber must have a
    /// start condition, and every configured circumstance must carry the level
    /// of the slot it is placed in. No condition may need more than
    /// [`MAX_RING_SAMPLES`] samples.
    pub fn new(
        name: impl Into<String>,
        metric: Metric,
        red: Circumstance,
        amber: Circumstance,
        green: Circumstance,
    ) -> Result<Self, WatchError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(WatchError::Validation("watch name must not be empty".to_string()));
        }
        if !red.is_specified() && !amber.is_specified() {
            return Err(WatchError::Validation(format!(
                "watch `{name}` needs a red or amber start condition"
            )));
        }
        for (slot, circumstance) in [(Level::Red, &red), (Level::Amber, &amber), (Level::Green, &green)] {
            if circumstance.is_specified() && circumstance.level() != slot {
                return Err(WatchError::Validation(format!(
                    "watch `{name}`: {} circumstance used as {slot}",
                    circumstance.level()
                )));
            }
            let suppressing = circumstance
                .suppression()
                .map_or_else(Retention::default, |s| s.condition.retention());
            let needed = circumstance.retention().max(suppressing);
            if needed.count > MAX_RING_SAMPLES {
                return Err(WatchError::Validation(format!(
                    "watch `{name}`: {slot} window of {} samples exceeds {MAX_RING_SAMPLES}",
                    needed.count
                )));
            }
        }
        Ok(Self {
            name,
            metric,
            disabled: false,
            red,
            amber,
            green,
        })
    }

    /// Same watch with the given disabled flag.
    pub fn with_disabled(self, disabled: bool) -> Self {
        Self { disabled, ..self }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    pub fn series(&self) -> &Series {
        &self.metric.series
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn red(&self) -> &Circumstance {
        &self.red
    }

    pub fn amber(&self) -> &Circumstance {
        &self.amber
    }

    pub fn green(&self) -> &Circumstance {
        &self.green
    }

    pub fn circumstance(&self, level: Level) -> &Circumstance {
        match level {
            Level::Red => &self.red,
            Level::Amber => &self.amber,
            Level::Green => &self.green,
        }
    }

    /// Distinct series of the suppressing metrics.
    pub fn suppressing_series(&self) -> Vec<Series> {
        let mut series: Vec<Series> = [&self.red, &self.amber, &self.green]
            .into_iter()
            .filter_map(|c| c.suppression().map(|s| s.metric.series.clone()))
            .collect();
        series.sort();
        series.dedup();
        series
    }

    /// History the watched series must retain for all circumstances.
    pub fn retention(&self) -> Retention {
        self.red
            .retention()
            .max(self.amber.retention())
            .max(self.green.retention())
    }

    /// Whether `series` is watched, directly or through a pattern on either side.
    pub fn watches(&self, series: &Series) -> bool {
        self.metric.series.matches(series) || series.matches(&self.metric.series)
    }
}

/// Level of one series+instance of a watch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyLevel {
    pub series: Series,
    pub instance: String,
    pub level: Option<Level>,
}

/// Snapshot of a watch with its current levels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchStatus {
    pub watch: Watch,
    pub states: Vec<KeyLevel>,
}

impl WatchStatus {
    /// Highest level across all keys, `None` when no key has a level.
    pub fn worst_level(&self) -> Option<Level> {
        self.states.iter().filter_map(|k| k.level).max()
    }
}
