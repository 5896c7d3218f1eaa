//! [`AlertRegistry`]: Serial-indexed alert store with bounded closed history.

use std::collections::{HashMap, VecDeque};

use vigil_core::Series;

use super::{Alert, AlertStatistics};
use crate::level::Level;

type OpenKey = (u64, Series, String);

/// Owns every alert. Open alerts are indexed by watch registration, series
/// and instance; closed alerts are kept until `max_closed` is exceeded, oldest
/// closed first.
#[derive(Debug)]
pub struct AlertRegistry {
    alerts: HashMap<u64, Alert>,
    open: HashMap<OpenKey, Vec<u64>>,
    closed: VecDeque<u64>,
    max_closed: usize,
    next_serial: u64,
    change_count: u64,
}

impl AlertRegistry {
    pub fn new(max_closed: usize) -> Self {
        Self {
            alerts: HashMap::new(),
            open: HashMap::new(),
            closed: VecDeque::new(),
            max_closed,
            next_serial: 1,
            change_count: 0,
        }
    }

    pub fn get(&self, serial: u64) -> Option<&Alert> {
        self.alerts.get(&serial)
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn change_count(&self) -> u64 {
        self.change_count
    }

    /// Raise an alert unless one is already open for the same key and level.
    pub fn raise(
        &mut self,
        watch_id: u64,
        watch: &str,
        series: &Series,
        instance: &str,
        level: Level,
        now: i64,
    ) -> Option<Alert> {
        let key = (watch_id, series.clone(), instance.to_string());
        let open = self.open.entry(key).or_default();
        if open
            .iter()
            .any(|serial| self.alerts.get(serial).is_some_and(|a| a.level == level))
        {
            return None;
        }
        let serial = self.next_serial;
        self.next_serial += 1;
        let alert = Alert {
            serial,
            watch: watch.to_string(),
            series: series.clone(),
            instance: instance.to_string(),
            level,
            started_at: now,
            acknowledged_at: None,
            closed_at: None,
            watch_id,
        };
        open.push(serial);
        self.alerts.insert(serial, alert.clone());
        self.change_count += 1;
        Some(alert)
    }

    /// Close the open alerts of a key whose level is above `level`.
    /// `None` is below every level, so it closes all of them.
    pub fn close_above(
        &mut self,
        watch_id: u64,
        series: &Series,
        instance: &str,
        level: Option<Level>,
        now: i64,
    ) -> Vec<Alert> {
        let key = (watch_id, series.clone(), instance.to_string());
        let Some(open) = self.open.get(&key) else {
            return Vec::new();
        };
        let serials: Vec<u64> = open
            .iter()
            .copied()
            .filter(|serial| {
                self.alerts
                    .get(serial)
                    .is_some_and(|a| Some(a.level) > level)
            })
            .collect();
        serials
            .into_iter()
            .filter_map(|serial| self.close(serial, now))
            .collect()
    }

    /// Close every open alert raised by a watch registration.
    pub fn close_watch(&mut self, watch_id: u64, now: i64) -> Vec<Alert> {
        let mut serials: Vec<u64> = self
            .open
            .iter()
            .filter(|((id, _, _), _)| *id == watch_id)
            .flat_map(|(_, serials)| serials.iter().copied())
            .collect();
        serials.sort_unstable();
        serials
            .into_iter()
            .filter_map(|serial| self.close(serial, now))
            .collect()
    }

    /// Set the acknowledgement time of an open, unacknowledged alert.
    /// Returns the updated alert, or `None` when nothing changed.
    pub fn acknowledge(&mut self, serial: u64, now: i64) -> Option<Alert> {
        let alert = self.alerts.get_mut(&serial)?;
        if alert.is_closed() || alert.is_acknowledged() {
            return None;
        }
        alert.acknowledged_at = Some(now);
        self.change_count += 1;
        Some(alert.clone())
    }

    /// All retained alerts ordered by serial.
    pub fn all(&self) -> Vec<Alert> {
        self.collect(|_| true)
    }

    pub fn open_alerts(&self) -> Vec<Alert> {
        self.collect(Alert::is_open)
    }

    /// Alerts whose series is matched by `series`, which may be a pattern.
    pub fn matching(&self, series: &Series) -> Vec<Alert> {
        self.collect(|a| series.matches(&a.series))
    }

    pub fn statistics(&self, watches: usize) -> AlertStatistics {
        let mut stats = AlertStatistics {
            change_count: self.change_count,
            watches,
            ..AlertStatistics::default()
        };
        for alert in self.alerts.values() {
            match (alert.is_closed(), alert.level, alert.is_acknowledged()) {
                (true, _, _) => stats.closed += 1,
                (false, Level::Red, false) => stats.unacknowledged_red += 1,
                (false, Level::Red, true) => stats.acknowledged_red += 1,
                (false, Level::Amber, false) => stats.unacknowledged_amber += 1,
                (false, Level::Amber, true) => stats.acknowledged_amber += 1,
                (false, Level::Green, _) => {}
            }
        }
        stats
    }

    fn collect(&self, filter: impl Fn(&Alert) -> bool) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self
            .alerts
            .values()
            .filter(|a| filter(a))
            .cloned()
            .collect();
        alerts.sort_by_key(|a| a.serial);
        alerts
    }

    fn close(&mut self, serial: u64, now: i64) -> Option<Alert> {
        let alert = self.alerts.get_mut(&serial)?;
        if alert.is_closed() {
            return None;
        }
        alert.closed_at = Some(now);
        let closed = alert.clone();

        let key = (closed.watch_id, closed.series.clone(), closed.instance.clone());
        if let Some(open) = self.open.get_mut(&key) {
            open.retain(|s| *s != serial);
            if open.is_empty() {
                self.open.remove(&key);
            }
        }
        self.closed.push_back(serial);
        while self.closed.len() > self.max_closed {
            if let Some(evicted) = self.closed.pop_front() {
                self.alerts.remove(&evicted);
            }
        }
        self.change_count += 1;
        Some(closed)
    }
}
