use serde::{Deserialize, Serialize};

/// A single observation: epoch milliseconds and value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

impl From<(i64, f64)> for Sample {
    fn from((time, value): (i64, f64)) -> Self {
        Self { time, value }
    }
}
