//! Structured log events for watch and alert lifecycle operations.
//!
//! Each function emits a `tracing` event with structured fields.

pub fn watch_added(name: &str, series: &str, replaced: bool) {
    tracing::info!(
        event = "watch_added",
        watch = %name,
        series = %series,
        replaced = replaced,
        "watch added"
    );
}

pub fn watch_removed(name: &str, closed_alerts: usize) {
    tracing::info!(
        event = "watch_removed",
        watch = %name,
        closed_alerts = closed_alerts,
        "watch removed"
    );
}

pub fn watch_toggled(name: &str, disabled: bool, closed_alerts: usize) {
    tracing::info!(
        event = "watch_toggled",
        watch = %name,
        disabled = disabled,
        closed_alerts = closed_alerts,
        "watch toggled"
    );
}

pub fn level_changed(watch: &str, series: &str, instance: &str, from: &str, to: &str) {
    tracing::debug!(
        event = "level_changed",
        watch = %watch,
        series = %series,
        instance = %instance,
        from = %from,
        to = %to,
        "watch level changed"
    );
}

pub fn alert_raised(serial: u64, watch: &str, series: &str, instance: &str, level: &str) {
    tracing::warn!(
        event = "alert_raised",
        serial = serial,
        watch = %watch,
        series = %series,
        instance = %instance,
        level = %level,
        "alert raised"
    );
}

pub fn alert_closed(serial: u64, watch: &str, level: &str) {
    tracing::info!(
        event = "alert_closed",
        serial = serial,
        watch = %watch,
        level = %level,
        "alert closed"
    );
}

pub fn alert_acknowledged(serial: u64) {
    tracing::info!(event = "alert_acknowledged", serial = serial, "alert acknowledged");
}

pub fn watch_evaluation_failed(watch: &str, error: &str) {
    tracing::warn!(
        event = "watch_evaluation_failed",
        watch = %watch,
        error = %error,
        "watch evaluation failed, skipped for this tick"
    );
}

pub fn tick_completed(watches: usize, raised: usize, closed: usize, failed: usize, duration_ms: u64) {
    tracing::debug!(
        event = "tick_completed",
        watches = watches,
        raised = raised,
        closed = closed,
        failed = failed,
        duration_ms = duration_ms,
        "evaluation tick completed"
    );
}
