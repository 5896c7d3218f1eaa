//! Comparison operators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vigil_core::WatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
    /// Satisfied when values in the window differ; threshold is ignored.
    Changed,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::Gt,
        Operator::Ge,
        Operator::Lt,
        Operator::Le,
        Operator::Eq,
        Operator::Ne,
        Operator::Changed,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Changed => "changed",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Gt => "gt",
            Operator::Ge => "ge",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Changed => "changed",
        }
    }

    /// Accepts a symbol (`>`, `>=`, `==`, `<>`, ...) or a name, ignoring case.
    pub fn parse(op: &str) -> Result<Self, WatchError> {
        let op = op.trim().to_ascii_lowercase();
        let parsed = match op.as_str() {
            ">" | "gt" => Operator::Gt,
            ">=" | "ge" => Operator::Ge,
            "<" | "lt" => Operator::Lt,
            "<=" | "le" => Operator::Le,
            "=" | "==" | "eq" => Operator::Eq,
            "!=" | "<>" | "ne" => Operator::Ne,
            "changed" => Operator::Changed,
            _ => {
                return Err(WatchError::Validation(format!("unknown operator `{op}`")));
            }
        };
        Ok(parsed)
    }

    /// `Changed` cannot be decided from a single pair and always yields false here.
    pub fn compare(self, value: f64, threshold: f64) -> bool {
        match self {
            Operator::Gt => value > threshold,
            Operator::Ge => value >= threshold,
            Operator::Lt => value < threshold,
            Operator::Le => value <= threshold,
            Operator::Eq => value == threshold,
            Operator::Ne => value != threshold,
            Operator::Changed => false,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
