//! [`InMemorySeriesRepository`]: A bounded in-process sample store.
//!
//! Backs tests and embedded deployments. Each series+instance stream keeps at
//! most `max_points` samples; older samples are dropped on ingest.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::RwLock;

use crate::errors::RepositoryError;
use crate::model::{Sample, Series, SeriesAnnotation, SeriesDataset};
use crate::traits::SeriesRepository;

pub const DEFAULT_MAX_POINTS: usize = 120;

type StreamKey = (Series, String);

#[derive(Debug, Default)]
struct Streams {
    points: BTreeMap<StreamKey, VecDeque<Sample>>,
    annotations: BTreeMap<StreamKey, VecDeque<SeriesAnnotation>>,
}

#[derive(Debug)]
pub struct InMemorySeriesRepository {
    streams: RwLock<Streams>,
    max_points: usize,
}

impl InMemorySeriesRepository {
    pub fn new() -> Self {
        Self::with_max_points(DEFAULT_MAX_POINTS)
    }

    pub fn with_max_points(max_points: usize) -> Self {
        Self {
            streams: RwLock::new(Streams::default()),
            max_points: max_points.max(1),
        }
    }

    /// Append a sample. Samples older than the newest stored sample of the
    /// stream are rejected so every stream stays time-ordered.
    pub fn ingest(
        &self,
        series: &Series,
        instance: &str,
        sample: Sample,
    ) -> Result<bool, RepositoryError> {
        let mut streams = self.write()?;
        let stream = streams
            .points
            .entry((series.clone(), instance.to_string()))
            .or_default();
        if stream.back().is_some_and(|last| last.time > sample.time) {
            return Ok(false);
        }
        stream.push_back(sample);
        while stream.len() > self.max_points {
            stream.pop_front();
        }
        Ok(true)
    }

    /// Attach an annotation; retention follows the same bound as samples.
    pub fn annotate(&self, annotation: SeriesAnnotation) -> Result<(), RepositoryError> {
        let mut streams = self.write()?;
        let stream = streams
            .annotations
            .entry((annotation.series.clone(), annotation.instance.clone()))
            .or_default();
        stream.push_back(annotation);
        while stream.len() > self.max_points {
            stream.pop_front();
        }
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Streams>, RepositoryError> {
        self.streams.read().map_err(|e| RepositoryError::Unavailable {
            reason: format!("series store lock poisoned: {e}"),
        })
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Streams>, RepositoryError> {
        self.streams.write().map_err(|e| RepositoryError::Unavailable {
            reason: format!("series store lock poisoned: {e}"),
        })
    }
}

impl Default for InMemorySeriesRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn selected(key: &StreamKey, series: &Series, instances: &[String]) -> bool {
    series.matches(&key.0) && (instances.is_empty() || instances.contains(&key.1))
}

impl SeriesRepository for InMemorySeriesRepository {
    fn select_series(
        &self,
        series: &Series,
        instances: &[String],
    ) -> Result<Vec<SeriesDataset>, RepositoryError> {
        let streams = self.read()?;
        Ok(streams
            .points
            .iter()
            .filter(|(key, _)| selected(key, series, instances))
            .map(|((s, instance), points)| {
                SeriesDataset::new(s.clone(), instance.clone(), points.iter().copied().collect())
            })
            .collect())
    }

    fn select_annotations(
        &self,
        series: &Series,
        instances: &[String],
    ) -> Result<Vec<SeriesAnnotation>, RepositoryError> {
        let streams = self.read()?;
        let mut annotations: Vec<SeriesAnnotation> = streams
            .annotations
            .iter()
            .filter(|(key, _)| selected(key, series, instances))
            .flat_map(|(_, list)| list.iter().cloned())
            .collect();
        annotations.sort_by_key(|a| a.time);
        Ok(annotations)
    }

    fn select_all_series(&self) -> Result<Vec<SeriesDataset>, RepositoryError> {
        let streams = self.read()?;
        Ok(streams
            .points
            .iter()
            .map(|((s, instance), points)| {
                SeriesDataset::new(s.clone(), instance.clone(), points.iter().copied().collect())
            })
            .collect())
    }

    fn instances(&self) -> Result<Vec<String>, RepositoryError> {
        let streams = self.read()?;
        let names: BTreeSet<&String> = streams.points.keys().map(|(_, i)| i).collect();
        Ok(names.into_iter().cloned().collect())
    }
}
