//! AlertEventHandler trait with no-op defaults.

use super::types::*;

/// Receives alert lifecycle events from the service.
///
/// Every method has a no-op default so implementors only override what they
/// need. Handlers run on the evaluation thread after all locks are released.
pub trait AlertEventHandler: Send + Sync {
    fn on_alert_raised(&self, _event: &AlertRaisedEvent) {}
    fn on_alert_closed(&self, _event: &AlertClosedEvent) {}
    fn on_alert_acknowledged(&self, _event: &AlertAcknowledgedEvent) {}
    fn on_level_changed(&self, _event: &LevelChangedEvent) {}
    fn on_watch_changed(&self, _event: &WatchChangedEvent) {}
}
