//! [`Circumstance`]: The start/stop rule pair for one severity level.

use serde::{Deserialize, Serialize};
use vigil_core::{Metric, Sample};

use crate::condition::{Condition, Retention};
use crate::level::Level;

/// Forces a circumstance inactive while a second metric satisfies a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suppression {
    pub metric: Metric,
    pub condition: Condition,
}

/// Immutable; builders return new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circumstance {
    level: Level,
    start: Condition,
    stop: Condition,
    suppression: Option<Suppression>,
}

impl Circumstance {
    /// A level that is not configured. Never active.
    pub const UNSPECIFIED: Circumstance = Circumstance {
        level: Level::Green,
        start: Condition::NONE,
        stop: Condition::NONE,
        suppression: None,
    };

    pub fn new(level: Level, start: Condition, stop: Condition) -> Self {
        Self {
            level,
            start,
            stop,
            suppression: None,
        }
    }

    /// Attach a suppression. A `NONE` condition removes it.
    pub fn suppressed_when(self, metric: Metric, condition: Condition) -> Self {
        let suppression = (!condition.is_none()).then_some(Suppression { metric, condition });
        Self {
            suppression,
            ..self
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn start(&self) -> &Condition {
        &self.start
    }

    pub fn stop(&self) -> &Condition {
        &self.stop
    }

    pub fn suppression(&self) -> Option<&Suppression> {
        self.suppression.as_ref()
    }

    pub fn is_specified(&self) -> bool {
        !self.start.is_none()
    }

    /// History the start and stop conditions need on the watched series.
    pub fn retention(&self) -> Retention {
        if !self.is_specified() {
            return Retention::default();
        }
        self.start.retention().max(self.stop.retention())
    }

    /// Whether the circumstance is active after seeing `window`.
    ///
    /// Suppression wins over everything. An inactive circumstance turns active
    /// when `start` holds; an active one stays active until `stop` holds.
    /// `suppressing` is `None` when the suppressing metric has no data, which
    /// never suppresses.
    pub fn evaluate(
        &self,
        window: &[Sample],
        suppressing: Option<&[Sample]>,
        currently_active: bool,
        now: i64,
    ) -> bool {
        if !self.is_specified() {
            return false;
        }
        if self.is_suppressed(suppressing, now) {
            return false;
        }
        if currently_active {
            !self.stop.is_satisfied(window, now)
        } else {
            self.start.is_satisfied(window, now)
        }
    }

    fn is_suppressed(&self, suppressing: Option<&[Sample]>, now: i64) -> bool {
        match (&self.suppression, suppressing) {
            (Some(suppression), Some(samples)) => suppression.condition.is_satisfied(samples, now),
            _ => false,
        }
    }
}

impl Default for Circumstance {
    fn default() -> Self {
        Self::UNSPECIFIED
    }
}
