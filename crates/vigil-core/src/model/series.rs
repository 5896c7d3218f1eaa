//! [`Series`]: Canonical identity of a metric decorated with instance tags.
//!
//! Text form: zero or more `key:value` tags followed by the metric name,
//! separated by [`Series::TAG_SEPARATOR`]. `ns:jvm @:app1 HeapUsage` has the
//! tags `ns=jvm`, `@=app1` and the name `HeapUsage`. A single segment is a
//! plain name, so `mem:heap` is a name without tags.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::InvalidSeriesError;

/// A parsed series. Equality, ordering and hashing use the canonical string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Series {
    key: String,
    tags: Vec<(String, String)>,
    name: String,
}

impl Series {
    pub const TAG_SEPARATOR: char = ' ';
    pub const TAG_ASSIGN: char = ':';
    pub const WILDCARD: &'static str = "*";

    /// Parse a series from its text form. Surrounding whitespace is ignored.
    pub fn parse(series: &str) -> Result<Self, InvalidSeriesError> {
        let trimmed = series.trim();
        if trimmed.is_empty() {
            return Err(InvalidSeriesError::Empty);
        }
        let segments: Vec<&str> = trimmed.split(Self::TAG_SEPARATOR).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(InvalidSeriesError::EmptySegment {
                series: trimmed.to_string(),
            });
        }
        let (name, tag_segments) = segments
            .split_last()
            .ok_or(InvalidSeriesError::Empty)?;

        let mut tags = Vec::with_capacity(tag_segments.len());
        for segment in tag_segments {
            match segment.split_once(Self::TAG_ASSIGN) {
                Some((key, value)) if !key.is_empty() && !value.is_empty() => {
                    tags.push((key.to_string(), value.to_string()));
                }
                _ => {
                    return Err(InvalidSeriesError::MalformedTag {
                        series: trimmed.to_string(),
                        tag: segment.to_string(),
                    })
                }
            }
        }

        Ok(Self {
            key: trimmed.to_string(),
            tags,
            name: name.to_string(),
        })
    }

    /// The metric name (last segment).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tags in declaration order.
    pub fn tags(&self) -> &[(String, String)] {
        &self.tags
    }

    /// Value of the tag with the given key.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// True when the name or any tag value is the wildcard.
    pub fn is_pattern(&self) -> bool {
        self.name == Self::WILDCARD || self.tags.iter().any(|(_, v)| v == Self::WILDCARD)
    }

    /// Whether `other` is matched by this series.
    ///
    /// A plain series only matches itself. A pattern matches any series with
    /// the same name (or any name for `*`) that carries every tag of the
    /// pattern, where a `*` value accepts any value. Extra tags on `other`
    /// are allowed.
    pub fn matches(&self, other: &Series) -> bool {
        if !self.is_pattern() {
            return self == other;
        }
        if self.name != Self::WILDCARD && self.name != other.name {
            return false;
        }
        self.tags.iter().all(|(key, value)| match other.tag(key) {
            Some(v) => value == Self::WILDCARD || value == v,
            None => false,
        })
    }
}

impl PartialEq for Series {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Series {}

impl Hash for Series {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for Series {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Series {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl FromStr for Series {
    type Err = InvalidSeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Series {
    type Error = InvalidSeriesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Series> for String {
    fn from(series: Series) -> Self {
        series.key
    }
}
