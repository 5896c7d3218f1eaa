//! Console data transfer types.
//!
//! Responses are built from engine values; [`WatchData`] and its parts also
//! travel the other way to create watches.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vigil_alert::{
    Alert, AlertStatistics, AlertStatus, Circumstance, Condition, Level, Operator, Watch,
    WatchStatus,
};
use vigil_core::{Metric, Sample, SeriesAnnotation, SeriesDataset, WatchError};

use crate::errors::ConsoleError;

// ---- Series and annotations ----

/// Samples of one series and instance with observed aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesData {
    pub series: String,
    pub instance: String,
    pub points: Vec<Sample>,
    pub observed_min: Option<f64>,
    pub observed_max: Option<f64>,
    pub observed_avg: Option<f64>,
}

impl SeriesData {
    /// `truncate` keeps only the most recent point; aggregates still cover
    /// every point of the dataset.
    pub fn from_dataset(dataset: &SeriesDataset, truncate: bool) -> Self {
        let values = dataset.points.iter().map(|p| p.value);
        let (min, max, sum) = values.fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), v| (min.min(v), max.max(v), sum + v),
        );
        let observed = !dataset.is_empty();
        let points = if truncate {
            dataset.last().into_iter().collect()
        } else {
            dataset.points.clone()
        };
        Self {
            series: dataset.series.to_string(),
            instance: dataset.instance.clone(),
            points,
            observed_min: observed.then_some(min),
            observed_max: observed.then_some(max),
            observed_avg: observed.then(|| sum / dataset.len() as f64),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationData {
    pub time: i64,
    pub series: String,
    pub instance: String,
    pub attrs: Vec<(String, String)>,
}

impl From<&SeriesAnnotation> for AnnotationData {
    fn from(annotation: &SeriesAnnotation) -> Self {
        Self {
            time: annotation.time,
            series: annotation.series.to_string(),
            instance: annotation.instance.clone(),
            attrs: annotation.attrs.clone(),
        }
    }
}

// ---- Watches ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionData {
    pub operator: String,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub for_times: Option<usize>,
    #[serde(default)]
    pub for_millis: Option<u64>,
    #[serde(default)]
    pub on_average: bool,
}

impl ConditionData {
    /// `None` for [`Condition::NONE`].
    pub fn from_condition(condition: &Condition) -> Option<Self> {
        let operator = condition.operator()?;
        Some(Self {
            operator: operator.symbol().to_string(),
            threshold: condition.threshold(),
            for_times: condition.for_times(),
            for_millis: condition.for_millis(),
            on_average: condition.is_on_average(),
        })
    }

    pub fn to_condition(&self) -> Result<Condition, WatchError> {
        let mut condition = Condition::new(Operator::parse(&self.operator)?, self.threshold);
        if let Some(millis) = self.for_millis {
            condition = condition.for_last_millis(millis);
        }
        if let Some(times) = self.for_times {
            condition = condition.for_last_times(times);
        }
        if self.on_average {
            condition = condition.on_average();
        }
        Ok(condition)
    }
}

fn to_condition(data: Option<&ConditionData>) -> Result<Condition, WatchError> {
    data.map_or(Ok(Condition::NONE), ConditionData::to_condition)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircumstanceData {
    /// Defaults to the level of the slot the circumstance is placed in.
    pub level: Option<String>,
    pub start: Option<ConditionData>,
    pub stop: Option<ConditionData>,
    pub suppress: Option<ConditionData>,
    pub suppressing_series: Option<String>,
    pub suppressing_unit: Option<String>,
}

impl CircumstanceData {
    /// `None` for an unspecified circumstance.
    pub fn from_circumstance(circumstance: &Circumstance) -> Option<Self> {
        if !circumstance.is_specified() {
            return None;
        }
        let suppression = circumstance.suppression();
        Some(Self {
            level: Some(circumstance.level().to_string()),
            start: ConditionData::from_condition(circumstance.start()),
            stop: ConditionData::from_condition(circumstance.stop()),
            suppress: suppression.and_then(|s| ConditionData::from_condition(&s.condition)),
            suppressing_series: suppression.map(|s| s.metric.series.to_string()),
            suppressing_unit: suppression.map(|s| s.metric.unit.short_name().to_string()),
        })
    }

    pub fn to_circumstance(&self, slot: Level) -> Result<Circumstance, ConsoleError> {
        let level = match &self.level {
            Some(level) => Level::parse(level)?,
            None => slot,
        };
        let circumstance = Circumstance::new(
            level,
            to_condition(self.start.as_ref())?,
            to_condition(self.stop.as_ref())?,
        );
        let Some(suppress) = &self.suppress else {
            return Ok(circumstance);
        };
        let series = self.suppressing_series.as_deref().ok_or_else(|| {
            WatchError::Validation("suppressing condition without suppressing series".to_string())
        })?;
        let metric = Metric::parse(series, self.suppressing_unit.as_deref())?;
        Ok(circumstance.suppressed_when(metric, suppress.to_condition()?))
    }
}

fn to_circumstance(data: Option<&CircumstanceData>, slot: Level) -> Result<Circumstance, ConsoleError> {
    data.map_or(Ok(Circumstance::UNSPECIFIED), |d| d.to_circumstance(slot))
}

/// Series to instance to level; `null` is "no level".
pub type WatchStates = BTreeMap<String, BTreeMap<String, Option<Level>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchData {
    pub name: String,
    pub series: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub red: Option<CircumstanceData>,
    #[serde(default)]
    pub amber: Option<CircumstanceData>,
    #[serde(default)]
    pub green: Option<CircumstanceData>,
    /// Current levels; ignored when creating a watch.
    #[serde(default)]
    pub states: WatchStates,
}

impl WatchData {
    /// Build and validate a watch. Unknown level or operator names and a
    /// blank name are validation errors; a malformed series or unit is an
    /// invalid metric.
    pub fn to_watch(&self) -> Result<Watch, ConsoleError> {
        if self.name.trim().is_empty() {
            return Err(WatchError::Validation("name missing".to_string()).into());
        }
        let red = to_circumstance(self.red.as_ref(), Level::Red)?;
        let amber = to_circumstance(self.amber.as_ref(), Level::Amber)?;
        let green = to_circumstance(self.green.as_ref(), Level::Green)?;
        let metric = Metric::parse(&self.series, self.unit.as_deref())?;
        let watch = Watch::new(self.name.clone(), metric, red, amber, green)?;
        Ok(watch.with_disabled(self.disabled))
    }
}

impl From<&Watch> for WatchData {
    fn from(watch: &Watch) -> Self {
        Self {
            name: watch.name().to_string(),
            series: watch.series().to_string(),
            unit: Some(watch.metric().unit.short_name().to_string()),
            disabled: watch.is_disabled(),
            red: CircumstanceData::from_circumstance(watch.red()),
            amber: CircumstanceData::from_circumstance(watch.amber()),
            green: CircumstanceData::from_circumstance(watch.green()),
            states: WatchStates::new(),
        }
    }
}

impl From<&WatchStatus> for WatchData {
    fn from(status: &WatchStatus) -> Self {
        let mut data = WatchData::from(&status.watch);
        for key in &status.states {
            data.states
                .entry(key.series.to_string())
                .or_default()
                .insert(key.instance.clone(), key.level);
        }
        data
    }
}

// ---- Alerts ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertData {
    pub serial: u64,
    pub watch: String,
    pub series: String,
    pub instance: String,
    pub level: Level,
    pub status: AlertStatus,
    pub started_at: i64,
    pub acknowledged_at: Option<i64>,
    pub closed_at: Option<i64>,
}

impl From<&Alert> for AlertData {
    fn from(alert: &Alert) -> Self {
        Self {
            serial: alert.serial,
            watch: alert.watch.clone(),
            series: alert.series.to_string(),
            instance: alert.instance.clone(),
            level: alert.level,
            status: alert.status(),
            started_at: alert.started_at,
            acknowledged_at: alert.acknowledged_at,
            closed_at: alert.closed_at,
        }
    }
}

// ---- Responses ----

/// Everything one query (or, when grouped, one literal series) matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesMatch {
    pub series: String,
    pub data: Vec<SeriesData>,
    pub annotations: Vec<AnnotationData>,
    pub watches: Vec<WatchData>,
    pub alerts: Vec<AlertData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesResponse {
    pub matches: Vec<SeriesMatch>,
    pub alerts: AlertStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertsResponse {
    pub alerts: Vec<AlertData>,
}

impl AlertsResponse {
    pub fn new(alerts: &[Alert]) -> Self {
        Self {
            alerts: alerts.iter().map(AlertData::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchesResponse {
    pub watches: Vec<WatchData>,
}
