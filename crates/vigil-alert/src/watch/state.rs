//! Mutable evaluation state of a watch.

use std::collections::{BTreeMap, HashMap};

use vigil_core::{Sample, Series, SeriesDataset};

use super::ring::SampleRing;
use super::{KeyLevel, Watch};
use crate::circumstance::Circumstance;
use crate::level::Level;

pub type StateKey = (Series, String);

/// Suppressing samples are buffered per level so each suppression condition
/// keeps the history it needs, even when levels share a suppressing metric.
type SuppressingKey = (Level, Series, String);

/// A level transition of one series+instance produced by [`WatchState::advance`].
#[derive(Debug, Clone, PartialEq)]
pub struct LevelChange {
    pub series: Series,
    pub instance: String,
    pub from: Option<Level>,
    pub to: Option<Level>,
}

#[derive(Debug, Clone)]
struct KeyState {
    level: Option<Level>,
    red: bool,
    amber: bool,
    green: bool,
    ring: SampleRing,
}

/// Owned by the service behind the watch's mutex.
#[derive(Debug, Default)]
pub struct WatchState {
    pub disabled: bool,
    /// Set when the watch was removed or replaced; evaluation must stop.
    pub retired: bool,
    keys: BTreeMap<StateKey, KeyState>,
    suppressing: HashMap<SuppressingKey, SampleRing>,
}

impl WatchState {
    pub fn new(disabled: bool) -> Self {
        Self {
            disabled,
            ..Self::default()
        }
    }

    /// Forget all levels and buffered samples.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.suppressing.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.disabled && !self.retired
    }

    pub fn level_of(&self, series: &Series, instance: &str) -> Option<Level> {
        self.keys
            .get(&(series.clone(), instance.to_string()))
            .and_then(|k| k.level)
    }

    pub fn levels(&self) -> Vec<KeyLevel> {
        self.keys
            .iter()
            .map(|((series, instance), k)| KeyLevel {
                series: series.clone(),
                instance: instance.clone(),
                level: k.level,
            })
            .collect()
    }

    /// Feed fresh repository data and run the level state machine.
    ///
    /// `suppressing` maps each suppression series of the watch to the datasets
    /// returned for it. Keys with no new samples keep their level.
    pub fn advance(
        &mut self,
        watch: &Watch,
        data: &[SeriesDataset],
        suppressing: &HashMap<Series, Vec<SeriesDataset>>,
        now: i64,
    ) -> Vec<LevelChange> {
        self.feed_suppressing(watch, suppressing, now);

        let retention = watch.retention();
        let mut changes = Vec::new();
        for dataset in data {
            if dataset.is_empty() {
                continue;
            }
            let key = (dataset.series.clone(), dataset.instance.clone());
            let state = self.keys.entry(key).or_insert_with(|| KeyState {
                level: None,
                red: false,
                amber: false,
                green: false,
                ring: SampleRing::new(retention),
            });
            if state.ring.extend_from(&dataset.points) == 0 {
                continue;
            }
            state.ring.prune(now);
            let window = state.ring.samples();

            let supp = |level: Level| {
                watch.circumstance(level).suppression().and_then(|s| {
                    self.suppressing
                        .get(&(level, s.metric.series.clone(), dataset.instance.clone()))
                })
            };
            let red_supp = supp(Level::Red);
            let amber_supp = supp(Level::Amber);
            let green_supp = supp(Level::Green);

            state.red = evaluate(watch.red(), window, red_supp, state.red, now);
            state.amber = evaluate(watch.amber(), window, amber_supp, state.amber, now);
            state.green = evaluate(watch.green(), window, green_supp, state.green, now);

            let level = if state.red {
                Some(Level::Red)
            } else if state.amber {
                Some(Level::Amber)
            } else if !watch.green().is_specified() || state.green {
                Some(Level::Green)
            } else {
                None
            };

            if level != state.level {
                changes.push(LevelChange {
                    series: dataset.series.clone(),
                    instance: dataset.instance.clone(),
                    from: state.level,
                    to: level,
                });
                state.level = level;
            }
        }
        changes
    }

    fn feed_suppressing(
        &mut self,
        watch: &Watch,
        suppressing: &HashMap<Series, Vec<SeriesDataset>>,
        now: i64,
    ) {
        for level in [Level::Red, Level::Amber, Level::Green] {
            let Some(suppression) = watch.circumstance(level).suppression() else {
                continue;
            };
            let Some(datasets) = suppressing.get(&suppression.metric.series) else {
                continue;
            };
            let retention = suppression.condition.retention();
            for dataset in datasets {
                let key = (level, suppression.metric.series.clone(), dataset.instance.clone());
                let ring = self
                    .suppressing
                    .entry(key)
                    .or_insert_with(|| SampleRing::new(retention));
                ring.extend_from(&dataset.points);
                ring.prune(now);
            }
        }
    }
}

fn evaluate(
    circumstance: &Circumstance,
    window: &[Sample],
    suppressing: Option<&SampleRing>,
    active: bool,
    now: i64,
) -> bool {
    circumstance.evaluate(window, suppressing.map(SampleRing::samples), active, now)
}
