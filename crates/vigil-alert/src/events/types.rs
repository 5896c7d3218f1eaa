//! Event payload types.

use vigil_core::Series;

use crate::alert::Alert;
use crate::level::Level;

/// Payload for `on_alert_raised`.
#[derive(Debug, Clone)]
pub struct AlertRaisedEvent {
    pub alert: Alert,
}

/// Payload for `on_alert_closed`.
#[derive(Debug, Clone)]
pub struct AlertClosedEvent {
    pub alert: Alert,
}

/// Payload for `on_alert_acknowledged`.
#[derive(Debug, Clone)]
pub struct AlertAcknowledgedEvent {
    pub alert: Alert,
}

/// Payload for `on_level_changed`.
#[derive(Debug, Clone)]
pub struct LevelChangedEvent {
    pub watch: String,
    pub series: Series,
    pub instance: String,
    pub from: Option<Level>,
    pub to: Option<Level>,
    pub at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchChange {
    Added,
    Replaced,
    Removed,
    Disabled,
    Enabled,
}

/// Payload for `on_watch_changed`.
#[derive(Debug, Clone)]
pub struct WatchChangedEvent {
    pub watch: String,
    pub change: WatchChange,
}
