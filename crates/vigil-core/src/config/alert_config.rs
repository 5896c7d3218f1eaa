//! Alert registry configuration.

use serde::{Deserialize, Serialize};

use super::defaults;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AlertConfig {
    /// Closed alerts kept for queries; the oldest are evicted first.
    /// Open alerts are never evicted. Default: 1000.
    pub max_closed_alerts: Option<usize>,
}

impl AlertConfig {
    pub fn effective_max_closed_alerts(&self) -> usize {
        self.max_closed_alerts
            .unwrap_or(defaults::DEFAULT_MAX_CLOSED_ALERTS)
    }
}
