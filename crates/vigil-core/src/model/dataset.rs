//! [`SeriesDataset`]: The samples of one series for one instance.

use serde::{Deserialize, Serialize};

use super::{Sample, Series};

/// Time-ordered samples of one series as reported by one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDataset {
    pub series: Series,
    pub instance: String,
    pub points: Vec<Sample>,
}

impl SeriesDataset {
    pub fn new(series: Series, instance: impl Into<String>, points: Vec<Sample>) -> Self {
        Self {
            series,
            instance: instance.into(),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Most recent sample, if any.
    pub fn last(&self) -> Option<Sample> {
        self.points.last().copied()
    }
}
