//! Series query requests.

use serde::{Deserialize, Serialize};

/// The kinds of data a [`SeriesQuery`] can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    Points,
    Annotations,
    Watches,
    Alerts,
}

/// One series to look up.
///
/// `series` may be a pattern. An empty `instances` list means all instances.
/// Types listed in `exclude` are not fetched. Types listed in `truncate`
/// are cut down to the most recent entry: the last point of each dataset,
/// the last annotation, or only the open alerts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesQuery {
    pub series: String,
    pub instances: Vec<String>,
    pub exclude: Vec<DataType>,
    pub truncate: Vec<DataType>,
}

impl SeriesQuery {
    pub fn new(series: impl Into<String>) -> Self {
        Self {
            series: series.into(),
            ..Self::default()
        }
    }

    pub fn with_instances(mut self, instances: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.instances = instances.into_iter().map(Into::into).collect();
        self
    }

    pub fn excluding(mut self, data_type: DataType) -> Self {
        if !self.exclude.contains(&data_type) {
            self.exclude.push(data_type);
        }
        self
    }

    pub fn truncating(mut self, data_type: DataType) -> Self {
        if !self.truncate.contains(&data_type) {
            self.truncate.push(data_type);
        }
        self
    }

    pub fn excludes(&self, data_type: DataType) -> bool {
        self.exclude.contains(&data_type)
    }

    pub fn truncates(&self, data_type: DataType) -> bool {
        self.truncate.contains(&data_type)
    }
}

/// A batch of queries answered together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesRequest {
    pub queries: Vec<SeriesQuery>,
    /// Regroup the matches by literal series instead of by query.
    pub group_by_series: bool,
}

impl SeriesRequest {
    pub fn single(series: impl Into<String>) -> Self {
        Self {
            queries: vec![SeriesQuery::new(series)],
            group_by_series: false,
        }
    }

    pub fn new(queries: Vec<SeriesQuery>) -> Self {
        Self {
            queries,
            group_by_series: false,
        }
    }

    pub fn grouped(mut self) -> Self {
        self.group_by_series = true;
        self
    }
}
