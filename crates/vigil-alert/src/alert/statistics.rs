//! [`AlertStatistics`]: Aggregate counters over the alert registry.

use serde::{Deserialize, Serialize};

/// Read-only snapshot; computed on demand by scanning alert state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlertStatistics {
    /// Number of raise, close and acknowledge events so far. Clients poll it
    /// to detect changes.
    pub change_count: u64,
    pub watches: usize,
    pub unacknowledged_red: usize,
    pub acknowledged_red: usize,
    pub unacknowledged_amber: usize,
    pub acknowledged_amber: usize,
    pub closed: usize,
}

impl AlertStatistics {
    pub fn open_red(&self) -> usize {
        self.unacknowledged_red + self.acknowledged_red
    }

    pub fn open_amber(&self) -> usize {
        self.unacknowledged_amber + self.acknowledged_amber
    }
}
