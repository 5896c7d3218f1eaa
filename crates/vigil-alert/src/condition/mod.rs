//! [`Condition`]: A single threshold comparison, optionally windowed and averaged.

pub mod operator;

use std::fmt;

use serde::{Deserialize, Serialize};
use vigil_core::Sample;

pub use operator::Operator;

/// Span a condition must hold over before it counts as satisfied.
///
/// A single field holds the window so a duration and a sample count can
/// never be set at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    /// The last `n` samples.
    Times(usize),
    /// Samples of the last `n` milliseconds.
    Millis(u64),
}

/// How much sample history evaluating a set of conditions needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Retention {
    pub count: usize,
    pub millis: u64,
}

impl Retention {
    pub fn max(self, other: Retention) -> Retention {
        Retention {
            count: self.count.max(other.count),
            millis: self.millis.max(other.millis),
        }
    }
}

/// Immutable comparison rule. Builders return new values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    operator: Option<Operator>,
    threshold: f64,
    window: Option<Window>,
    on_average: bool,
}

impl Condition {
    /// Never satisfied.
    pub const NONE: Condition = Condition {
        operator: None,
        threshold: 0.0,
        window: None,
        on_average: false,
    };

    pub fn new(operator: Operator, threshold: f64) -> Self {
        Self {
            operator: Some(operator),
            threshold,
            window: None,
            on_average: false,
        }
    }

    pub fn is_none(&self) -> bool {
        self.operator.is_none()
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }

    pub fn is_on_average(&self) -> bool {
        self.on_average
    }

    pub fn for_millis(&self) -> Option<u64> {
        match self.window {
            Some(Window::Millis(ms)) => Some(ms),
            _ => None,
        }
    }

    pub fn for_times(&self) -> Option<usize> {
        match self.window {
            Some(Window::Times(n)) => Some(n),
            _ => None,
        }
    }

    /// Hold over the last `millis` milliseconds. Replaces a sample-count window;
    /// zero clears the window. Only the newest
    /// [`MAX_RING_SAMPLES`](crate::watch::MAX_RING_SAMPLES) samples are
    /// buffered, so a window denser than that never counts as covered.
    pub fn for_last_millis(self, millis: u64) -> Self {
        self.with_window((millis > 0).then_some(Window::Millis(millis)))
    }

    /// Hold over the last `times` samples. Replaces a duration window;
    /// zero clears the window. Watches reject windows longer than
    /// [`MAX_RING_SAMPLES`](crate::watch::MAX_RING_SAMPLES).
    pub fn for_last_times(self, times: usize) -> Self {
        self.with_window((times > 0).then_some(Window::Times(times)))
    }

    /// Compare the window mean instead of every sample.
    pub fn on_average(self) -> Self {
        if self.is_none() {
            return self;
        }
        Self {
            on_average: true,
            ..self
        }
    }

    fn with_window(self, window: Option<Window>) -> Self {
        if self.is_none() {
            return self;
        }
        Self { window, ..self }
    }

    /// History needed to evaluate this condition.
    pub fn retention(&self) -> Retention {
        match (self.operator, self.window) {
            (None, _) => Retention::default(),
            (Some(_), Some(Window::Times(n))) => Retention { count: n, millis: 0 },
            (Some(_), Some(Window::Millis(ms))) => Retention { count: 1, millis: ms },
            (Some(Operator::Changed), None) => Retention { count: 2, millis: 0 },
            (Some(_), None) => Retention { count: 1, millis: 0 },
        }
    }

    /// Evaluate against time-ordered samples at time `now`.
    ///
    /// A windowed condition only counts once its window is full: a count
    /// window needs at least that many samples, a duration window needs
    /// history reaching back to `now - millis`. Without averaging every
    /// sample in the window must satisfy the comparison.
    pub fn is_satisfied(&self, samples: &[Sample], now: i64) -> bool {
        let Some(operator) = self.operator else {
            return false;
        };
        let Some(window) = self.select(operator, samples, now) else {
            return false;
        };
        if window.is_empty() {
            return false;
        }
        if operator == Operator::Changed {
            return window.windows(2).any(|pair| pair[0].value != pair[1].value);
        }
        if self.on_average {
            let mean = window.iter().map(|s| s.value).sum::<f64>() / window.len() as f64;
            operator.compare(mean, self.threshold)
        } else {
            window
                .iter()
                .all(|s| operator.compare(s.value, self.threshold))
        }
    }

    fn select<'a>(&self, operator: Operator, samples: &'a [Sample], now: i64) -> Option<&'a [Sample]> {
        match self.window {
            None => {
                let n = if operator == Operator::Changed { 2 } else { 1 };
                Some(&samples[samples.len().saturating_sub(n)..])
            }
            Some(Window::Times(n)) => {
                (samples.len() >= n).then(|| &samples[samples.len() - n..])
            }
            Some(Window::Millis(ms)) => {
                let start = now.saturating_sub(i64::try_from(ms).unwrap_or(i64::MAX));
                let covered = samples.first().is_some_and(|s| s.time <= start);
                if !covered {
                    return None;
                }
                let from = samples.partition_point(|s| s.time < start);
                Some(&samples[from..])
            }
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(operator) = self.operator else {
            return f.write_str("none");
        };
        if self.on_average {
            f.write_str("avg ")?;
        }
        if operator == Operator::Changed {
            f.write_str("value changed")?;
        } else {
            write!(f, "value {} {}", operator, self.threshold)?;
        }
        match self.window {
            Some(Window::Times(n)) => write!(f, " for last {n}x"),
            Some(Window::Millis(ms)) => write!(f, " for {ms}ms"),
            None => Ok(()),
        }
    }
}
