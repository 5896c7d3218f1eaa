//! Alerts raised by watches and the registry that owns them.

pub mod registry;
pub mod statistics;

use serde::{Deserialize, Serialize};
use vigil_core::Series;

use crate::level::Level;

pub use registry::AlertRegistry;
pub use statistics::AlertStatistics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Open,
    Acknowledged,
    Closed,
}

/// A watch having reached a level for one series+instance.
///
/// The serial is assigned by the registry and never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub serial: u64,
    pub watch: String,
    pub series: Series,
    pub instance: String,
    pub level: Level,
    pub started_at: i64,
    pub acknowledged_at: Option<i64>,
    pub closed_at: Option<i64>,
    /// Registration of the watch that raised it; distinguishes a replaced
    /// watch from its successor of the same name.
    #[serde(skip)]
    pub(crate) watch_id: u64,
}

impl Alert {
    pub fn status(&self) -> AlertStatus {
        if self.closed_at.is_some() {
            AlertStatus::Closed
        } else if self.acknowledged_at.is_some() {
            AlertStatus::Acknowledged
        } else {
            AlertStatus::Open
        }
    }

    /// Open or acknowledged.
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged_at.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }
}
