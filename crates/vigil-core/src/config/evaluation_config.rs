//! Evaluation loop configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Milliseconds between evaluation ticks. Default: 4000.
    pub interval_ms: Option<u64>,
    /// Evaluate watches of one tick in parallel. Default: true.
    pub parallel: Option<bool>,
}

impl EvaluationConfig {
    pub fn effective_interval_ms(&self) -> u64 {
        self.interval_ms
            .unwrap_or(defaults::DEFAULT_EVALUATION_INTERVAL_MS)
    }

    pub fn effective_interval(&self) -> Duration {
        Duration::from_millis(self.effective_interval_ms())
    }

    pub fn effective_parallel(&self) -> bool {
        self.parallel
            .unwrap_or(defaults::DEFAULT_PARALLEL_EVALUATION)
    }
}
