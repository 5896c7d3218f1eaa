//! [`AlertService`]: Watch registry, alert registry and the evaluation tick.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use dashmap::DashMap;
use rayon::prelude::*;
use vigil_core::tracing_setup::events;
use vigil_core::{RepositoryError, Series, SeriesDataset, SeriesRepository, VigilConfig, WatchError};

use crate::alert::{Alert, AlertRegistry, AlertStatistics};
use crate::events::{
    AlertAcknowledgedEvent, AlertClosedEvent, AlertEventDispatcher, AlertEventHandler,
    AlertRaisedEvent, LevelChangedEvent, WatchChange, WatchChangedEvent,
};
use crate::level::level_name;
use crate::watch::{Watch, WatchState, WatchStatus};

/// Source of the current time in epoch milliseconds.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Wall clock in epoch milliseconds.
pub fn system_clock() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// One registration of a watch. Replacing a watch creates a new entry with a
/// new id, so alerts of the old registration never leak into the new one.
struct WatchEntry {
    id: u64,
    watch: Watch,
    state: Mutex<WatchState>,
}

impl WatchEntry {
    fn state(&self) -> MutexGuard<'_, WatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> Watch {
        let disabled = self.state().disabled;
        self.watch.clone().with_disabled(disabled)
    }
}

/// Result of one evaluation pass.
#[derive(Debug, Default)]
pub struct TickReport {
    pub evaluated: usize,
    pub skipped: usize,
    pub raised: Vec<Alert>,
    pub closed: Vec<Alert>,
    pub changes: Vec<LevelChangedEvent>,
    /// Watches whose data could not be fetched; they keep their state.
    pub errors: Vec<(String, RepositoryError)>,
    pub duration_ms: u64,
}

impl TickReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

enum Evaluation {
    Skipped,
    Done {
        raised: Vec<Alert>,
        closed: Vec<Alert>,
        changes: Vec<LevelChangedEvent>,
    },
    Failed(String, RepositoryError),
}

/// Owns watches and alerts and evaluates watches against a [`SeriesRepository`].
///
/// Lock order is always watch state before the alert registry. Each watch's
/// state mutex is held for the whole fetch and evaluate sequence of that
/// watch, so toggling or removing a watch serializes with its evaluation.
pub struct AlertService {
    repository: Arc<dyn SeriesRepository>,
    watches: DashMap<String, Arc<WatchEntry>>,
    alerts: RwLock<AlertRegistry>,
    dispatcher: AlertEventDispatcher,
    next_watch_id: AtomicU64,
    clock: Clock,
    parallel: bool,
}

impl AlertService {
    pub fn new(repository: Arc<dyn SeriesRepository>, config: &VigilConfig) -> Self {
        Self {
            repository,
            watches: DashMap::new(),
            alerts: RwLock::new(AlertRegistry::new(config.alerts.effective_max_closed_alerts())),
            dispatcher: AlertEventDispatcher::new(),
            next_watch_id: AtomicU64::new(1),
            clock: Arc::new(system_clock),
            parallel: config.evaluation.effective_parallel(),
        }
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn AlertEventHandler>) -> Self {
        self.dispatcher.register(handler);
        self
    }

    /// Replace the clock used by [`tick_now`](Self::tick_now) and for
    /// acknowledgement and watch removal timestamps.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> i64 {
        (self.clock)()
    }

    pub fn repository(&self) -> &Arc<dyn SeriesRepository> {
        &self.repository
    }

    // ---- Watch registry ----

    /// Register a watch, replacing any watch with the same name.
    ///
    /// The replaced watch stops evaluating and its open alerts are closed.
    /// Returns the replaced watch.
    pub fn add_watch(&self, watch: Watch) -> Option<Watch> {
        let now = self.now();
        let name = watch.name().to_string();
        let series = watch.series().to_string();
        let entry = Arc::new(WatchEntry {
            id: self.next_watch_id.fetch_add(1, Ordering::Relaxed),
            state: Mutex::new(WatchState::new(watch.is_disabled())),
            watch,
        });

        let previous = self.watches.insert(name.clone(), entry);
        let (replaced, closed) = match &previous {
            Some(old) => (Some(old.snapshot()), self.retire(old, now)),
            None => (None, Vec::new()),
        };

        events::watch_added(&name, &series, replaced.is_some());
        self.emit_closed(&closed);
        self.dispatcher.emit_watch_changed(&WatchChangedEvent {
            watch: name,
            change: if replaced.is_some() {
                WatchChange::Replaced
            } else {
                WatchChange::Added
            },
        });
        replaced
    }

    /// Remove a watch and close its open alerts. Unknown names are a no-op.
    pub fn remove_watch(&self, name: &str) -> Option<Watch> {
        let (_, entry) = self.watches.remove(name)?;
        let removed = entry.snapshot();
        let closed = self.retire(&entry, self.now());

        events::watch_removed(name, closed.len());
        self.emit_closed(&closed);
        self.dispatcher.emit_watch_changed(&WatchChangedEvent {
            watch: name.to_string(),
            change: WatchChange::Removed,
        });
        Some(removed)
    }

    /// Disable or enable a watch.
    ///
    /// Disabling clears the evaluation state and closes the watch's open
    /// alerts. Enabling starts again from no level. Setting the current
    /// state again changes nothing.
    pub fn toggle_watch(&self, name: &str, disabled: bool) -> Result<(), WatchError> {
        let entry = self
            .entry(name)
            .ok_or_else(|| WatchError::NotFound(name.to_string()))?;

        let closed = {
            let mut state = entry.state();
            if state.retired || state.disabled == disabled {
                return Ok(());
            }
            state.disabled = disabled;
            state.clear();
            if disabled {
                self.alerts_mut().close_watch(entry.id, self.now())
            } else {
                Vec::new()
            }
        };

        events::watch_toggled(name, disabled, closed.len());
        self.emit_closed(&closed);
        self.dispatcher.emit_watch_changed(&WatchChangedEvent {
            watch: name.to_string(),
            change: if disabled {
                WatchChange::Disabled
            } else {
                WatchChange::Enabled
            },
        });
        Ok(())
    }

    pub fn watch_by_name(&self, name: &str) -> Option<Watch> {
        self.entry(name).map(|e| e.snapshot())
    }

    /// All watches ordered by name.
    pub fn watches(&self) -> Vec<Watch> {
        self.entries().iter().map(|e| e.snapshot()).collect()
    }

    pub fn watch_count(&self) -> usize {
        self.watches.len()
    }

    /// Watches with the current level of every series+instance they track.
    pub fn watch_statuses(&self) -> Vec<WatchStatus> {
        self.entries()
            .iter()
            .map(|e| {
                let state = e.state();
                WatchStatus {
                    watch: e.watch.clone().with_disabled(state.disabled),
                    states: state.levels(),
                }
            })
            .collect()
    }

    /// Watches whose metric matches `series`. Either side may be a pattern.
    pub fn watches_for(&self, series: &Series) -> Vec<Watch> {
        self.entries()
            .iter()
            .filter(|e| e.watch.watches(series))
            .map(|e| e.snapshot())
            .collect()
    }

    // ---- Alert registry ----

    pub fn alert_by_serial(&self, serial: u64) -> Option<Alert> {
        self.alerts_ref().get(serial).cloned()
    }

    /// All retained alerts ordered by serial.
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts_ref().all()
    }

    /// Alerts of series matched by `series`, which may be a pattern.
    pub fn alerts_for(&self, series: &Series) -> Vec<Alert> {
        self.alerts_ref().matching(series)
    }

    pub fn open_alerts(&self) -> Vec<Alert> {
        self.alerts_ref().open_alerts()
    }

    /// Acknowledge an open alert. Closed, unknown or already acknowledged
    /// alerts are left untouched and `None` is returned.
    pub fn acknowledge(&self, serial: u64) -> Option<Alert> {
        let acknowledged = self.alerts_mut().acknowledge(serial, self.now())?;
        events::alert_acknowledged(serial);
        self.dispatcher.emit_alert_acknowledged(&AlertAcknowledgedEvent {
            alert: acknowledged.clone(),
        });
        Some(acknowledged)
    }

    pub fn statistics(&self) -> AlertStatistics {
        let watches = self.watch_count();
        self.alerts_ref().statistics(watches)
    }

    // ---- Evaluation ----

    /// Evaluate every enabled watch at the current clock time.
    pub fn tick_now(&self) -> TickReport {
        self.tick(self.now())
    }

    /// One evaluation pass over all enabled watches at time `now`.
    ///
    /// A watch whose data cannot be fetched is reported in
    /// [`TickReport::errors`] and keeps its state; the others proceed.
    pub fn tick(&self, now: i64) -> TickReport {
        let started = Instant::now();
        let entries = self.entries();

        let evaluations: Vec<Evaluation> = if self.parallel {
            entries.par_iter().map(|e| self.evaluate(e, now)).collect()
        } else {
            entries.iter().map(|e| self.evaluate(e, now)).collect()
        };

        let mut report = TickReport::default();
        for evaluation in evaluations {
            match evaluation {
                Evaluation::Skipped => report.skipped += 1,
                Evaluation::Failed(watch, error) => {
                    events::watch_evaluation_failed(&watch, &error.to_string());
                    report.errors.push((watch, error));
                }
                Evaluation::Done {
                    raised,
                    closed,
                    changes,
                } => {
                    report.evaluated += 1;
                    report.raised.extend(raised);
                    report.closed.extend(closed);
                    report.changes.extend(changes);
                }
            }
        }

        for change in &report.changes {
            events::level_changed(
                &change.watch,
                change.series.as_str(),
                &change.instance,
                level_name(change.from),
                level_name(change.to),
            );
            self.dispatcher.emit_level_changed(change);
        }
        self.emit_closed(&report.closed);
        for alert in &report.raised {
            events::alert_raised(
                alert.serial,
                &alert.watch,
                alert.series.as_str(),
                &alert.instance,
                alert.level.as_str(),
            );
            self.dispatcher
                .emit_alert_raised(&AlertRaisedEvent { alert: alert.clone() });
        }

        report.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        events::tick_completed(
            entries.len(),
            report.raised.len(),
            report.closed.len(),
            report.errors.len(),
            report.duration_ms,
        );
        report
    }

    fn evaluate(&self, entry: &WatchEntry, now: i64) -> Evaluation {
        let mut state = entry.state();
        if !state.is_active() {
            return Evaluation::Skipped;
        }
        let watch = &entry.watch;

        let data = match self.repository.select_series(watch.series(), &[]) {
            Ok(data) => data,
            Err(e) => return Evaluation::Failed(watch.name().to_string(), e),
        };
        let mut suppressing: HashMap<Series, Vec<SeriesDataset>> = HashMap::new();
        for series in watch.suppressing_series() {
            match self.repository.select_series(&series, &[]) {
                Ok(datasets) => {
                    suppressing.insert(series, datasets);
                }
                Err(e) => return Evaluation::Failed(watch.name().to_string(), e),
            }
        }

        let level_changes = state.advance(watch, &data, &suppressing, now);
        let mut raised = Vec::new();
        let mut closed = Vec::new();
        if !level_changes.is_empty() {
            let mut alerts = self.alerts_mut();
            for change in &level_changes {
                closed.extend(alerts.close_above(
                    entry.id,
                    &change.series,
                    &change.instance,
                    change.to,
                    now,
                ));
                if let Some(level) = change.to.filter(|l| l.is_alerting()) {
                    raised.extend(alerts.raise(
                        entry.id,
                        watch.name(),
                        &change.series,
                        &change.instance,
                        level,
                        now,
                    ));
                }
            }
        }

        let changes = level_changes
            .into_iter()
            .map(|c| LevelChangedEvent {
                watch: watch.name().to_string(),
                series: c.series,
                instance: c.instance,
                from: c.from,
                to: c.to,
                at: now,
            })
            .collect();
        Evaluation::Done {
            raised,
            closed,
            changes,
        }
    }

    // ---- Internals ----

    fn entry(&self, name: &str) -> Option<Arc<WatchEntry>> {
        self.watches.get(name).map(|e| Arc::clone(e.value()))
    }

    /// Snapshot of the registry ordered by name. No map shard lock is held
    /// once this returns.
    fn entries(&self) -> Vec<Arc<WatchEntry>> {
        let mut entries: Vec<Arc<WatchEntry>> =
            self.watches.iter().map(|e| Arc::clone(e.value())).collect();
        entries.sort_by(|a, b| a.watch.name().cmp(b.watch.name()));
        entries
    }

    /// Stop a registration for good and close its alerts.
    fn retire(&self, entry: &WatchEntry, now: i64) -> Vec<Alert> {
        let mut state = entry.state();
        state.retired = true;
        state.clear();
        self.alerts_mut().close_watch(entry.id, now)
    }

    fn emit_closed(&self, closed: &[Alert]) {
        for alert in closed {
            events::alert_closed(alert.serial, &alert.watch, alert.level.as_str());
            self.dispatcher
                .emit_alert_closed(&AlertClosedEvent { alert: alert.clone() });
        }
    }

    fn alerts_ref(&self) -> RwLockReadGuard<'_, AlertRegistry> {
        self.alerts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn alerts_mut(&self) -> RwLockWriteGuard<'_, AlertRegistry> {
        self.alerts.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for AlertService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertService")
            .field("watches", &self.watches.len())
            .field("parallel", &self.parallel)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
