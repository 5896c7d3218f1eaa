//! [`Console`]: Console-facing operations over the repository and alert service.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;
use vigil_alert::{AlertService, Watch};
use vigil_core::{Series, SeriesRepository};

use crate::errors::ConsoleError;
use crate::grouping::group_by_series;
use crate::requests::{DataType, SeriesQuery, SeriesRequest};
use crate::responses::{
    AlertData, AlertsResponse, AnnotationData, SeriesData, SeriesMatch, SeriesResponse, WatchData,
    WatchesResponse,
};

/// Both collaborators are passed in; the console holds no state of its own.
///
/// Series strings coming from clients that do not parse are treated as
/// matching nothing rather than as errors.
pub struct Console {
    repository: Arc<dyn SeriesRepository>,
    alerts: Arc<AlertService>,
}

impl Console {
    pub fn new(repository: Arc<dyn SeriesRepository>, alerts: Arc<AlertService>) -> Self {
        Self { repository, alerts }
    }

    pub fn alert_service(&self) -> &Arc<AlertService> {
        &self.alerts
    }

    // ---- Series ----

    /// Everything known about one series string.
    pub fn series_data(&self, series: &str) -> Result<SeriesResponse, ConsoleError> {
        self.query(&SeriesRequest::single(series))
    }

    /// Answer a batch of queries, one match per query unless grouping by
    /// series is requested. Statistics are always attached.
    pub fn query(&self, request: &SeriesRequest) -> Result<SeriesResponse, ConsoleError> {
        let mut matches = Vec::with_capacity(request.queries.len());
        for query in &request.queries {
            matches.push(self.query_match(query)?);
        }
        if request.group_by_series {
            matches = group_by_series(matches);
        }
        Ok(SeriesResponse {
            matches,
            alerts: self.alerts.statistics(),
        })
    }

    fn query_match(&self, query: &SeriesQuery) -> Result<SeriesMatch, ConsoleError> {
        let mut result = SeriesMatch {
            series: query.series.clone(),
            ..SeriesMatch::default()
        };
        let Some(series) = parse_series(&query.series) else {
            return Ok(result);
        };

        if !query.excludes(DataType::Points) {
            let truncate = query.truncates(DataType::Points);
            result.data = self
                .repository
                .select_series(&series, &query.instances)?
                .iter()
                .map(|d| SeriesData::from_dataset(d, truncate))
                .collect();
        }
        if !query.excludes(DataType::Annotations) {
            let mut annotations = self.repository.select_annotations(&series, &query.instances)?;
            if query.truncates(DataType::Annotations) {
                annotations = annotations.split_off(annotations.len().saturating_sub(1));
            }
            result.annotations = annotations.iter().map(AnnotationData::from).collect();
        }
        if !query.excludes(DataType::Watches) {
            result.watches = self
                .alerts
                .watch_statuses()
                .iter()
                .filter(|s| s.watch.watches(&series))
                .map(WatchData::from)
                .collect();
        }
        if !query.excludes(DataType::Alerts) {
            let open_only = query.truncates(DataType::Alerts);
            result.alerts = self
                .alerts
                .alerts_for(&series)
                .iter()
                .filter(|a| !open_only || a.is_open())
                .map(AlertData::from)
                .collect();
        }
        Ok(result)
    }

    pub fn annotations_data(&self, series: &str) -> Result<Vec<AnnotationData>, ConsoleError> {
        let Some(series) = parse_series(series) else {
            return Ok(Vec::new());
        };
        Ok(self
            .repository
            .select_annotations(&series, &[])?
            .iter()
            .map(AnnotationData::from)
            .collect())
    }

    /// Canonical names of all series the repository holds, sorted.
    pub fn series_names(&self) -> Result<Vec<String>, ConsoleError> {
        let names: BTreeSet<String> = self
            .repository
            .select_all_series()?
            .iter()
            .map(|d| d.series.to_string())
            .collect();
        Ok(names.into_iter().collect())
    }

    pub fn instance_names(&self) -> Result<Vec<String>, ConsoleError> {
        Ok(self.repository.instances()?)
    }

    // ---- Alerts ----

    pub fn alerts_data(&self) -> AlertsResponse {
        AlertsResponse::new(&self.alerts.alerts())
    }

    /// A string of digits is an alert serial, anything else a series.
    pub fn alerts_data_for(&self, series_or_serial: &str) -> AlertsResponse {
        let key = series_or_serial.trim();
        if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
            let alert = key.parse().ok().and_then(|serial| self.alerts.alert_by_serial(serial));
            return AlertsResponse::new(alert.as_slice());
        }
        match parse_series(key) {
            Some(series) => AlertsResponse::new(&self.alerts.alerts_for(&series)),
            None => AlertsResponse::new(&[]),
        }
    }

    /// Unknown and closed alerts are ignored.
    pub fn acknowledge_alert(&self, serial: u64) {
        self.alerts.acknowledge(serial);
    }

    // ---- Watches ----

    pub fn watches_data(&self) -> WatchesResponse {
        WatchesResponse {
            watches: self
                .alerts
                .watch_statuses()
                .iter()
                .map(WatchData::from)
                .collect(),
        }
    }

    /// Removing an unknown watch does nothing.
    pub fn delete_watch(&self, name: &str) {
        self.alerts.remove_watch(name);
    }

    /// Create or replace a watch.
    pub fn create_watch(&self, data: &WatchData) -> Result<Watch, ConsoleError> {
        let watch = data.to_watch()?;
        self.alerts.add_watch(watch.clone());
        Ok(watch)
    }

    pub fn patch_watch(&self, name: &str, disable: bool) -> Result<(), ConsoleError> {
        Ok(self.alerts.toggle_watch(name, disable)?)
    }
}

fn parse_series(series: &str) -> Option<Series> {
    match Series::parse(series) {
        Ok(series) => Some(series),
        Err(e) => {
            debug!(series = %series, error = %e, "ignoring invalid series");
            None
        }
    }
}
