use serde::{Deserialize, Serialize};

use super::Series;

/// A timestamped set of attributes attached to a series and instance,
/// e.g. the slow request that pushed a response time up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesAnnotation {
    pub time: i64,
    pub series: Series,
    pub instance: String,
    pub attrs: Vec<(String, String)>,
}

impl SeriesAnnotation {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
