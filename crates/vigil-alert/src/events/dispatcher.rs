//! AlertEventDispatcher: Synchronous fan-out to registered handlers.

use std::sync::Arc;

use super::handler::AlertEventHandler;
use super::types::*;

/// Calls every registered handler in registration order.
///
/// A panicking handler is logged and skipped; later handlers still receive
/// the event. With no handlers `emit` is an empty loop.
#[derive(Default)]
pub struct AlertEventDispatcher {
    handlers: Vec<Arc<dyn AlertEventHandler>>,
}

impl AlertEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn AlertEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    fn emit<F: Fn(&dyn AlertEventHandler)>(&self, event: &'static str, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::error!(event = event, "alert event handler panicked");
            }
        }
    }

    pub fn emit_alert_raised(&self, event: &AlertRaisedEvent) {
        self.emit("alert_raised", |h| h.on_alert_raised(event));
    }

    pub fn emit_alert_closed(&self, event: &AlertClosedEvent) {
        self.emit("alert_closed", |h| h.on_alert_closed(event));
    }

    pub fn emit_alert_acknowledged(&self, event: &AlertAcknowledgedEvent) {
        self.emit("alert_acknowledged", |h| h.on_alert_acknowledged(event));
    }

    pub fn emit_level_changed(&self, event: &LevelChangedEvent) {
        self.emit("level_changed", |h| h.on_level_changed(event));
    }

    pub fn emit_watch_changed(&self, event: &WatchChangedEvent) {
        self.emit("watch_changed", |h| h.on_watch_changed(event));
    }
}

impl std::fmt::Debug for AlertEventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertEventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
