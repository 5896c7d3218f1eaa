//! [`SampleRing`]: Per series+instance sample buffer fed incrementally.

use std::collections::VecDeque;

use vigil_core::Sample;

use crate::condition::Retention;

/// Upper bound on buffered samples regardless of the configured windows.
pub const MAX_RING_SAMPLES: usize = 10_000;

/// Keeps just enough history for the windows a watch evaluates.
///
/// Streams are non-decreasing in time, so a later snapshot may repeat the
/// last timestamp with new values. The ring remembers how many samples it
/// took at its last timestamp and only accepts what follows them, so feeding
/// the same repository snapshot twice is a no-op. The buffer is kept
/// contiguous after every mutation so evaluation can borrow it as a slice.
///
/// At most [`MAX_RING_SAMPLES`] samples are buffered; watches needing more
/// are rejected when built.
#[derive(Debug, Clone)]
pub struct SampleRing {
    samples: VecDeque<Sample>,
    retention: Retention,
    last: Option<i64>,
    taken_at_last: usize,
}

impl SampleRing {
    pub fn new(retention: Retention) -> Self {
        Self {
            samples: VecDeque::new(),
            retention: Retention {
                count: retention.count.clamp(1, MAX_RING_SAMPLES),
                millis: retention.millis,
            },
            last: None,
            taken_at_last: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Timestamp of the newest sample ever taken.
    pub fn last_time(&self) -> Option<i64> {
        self.last
    }

    /// Append the samples of `points` not taken yet. Returns how many were
    /// taken.
    pub fn extend_from(&mut self, points: &[Sample]) -> usize {
        let start = match self.last {
            Some(last) => {
                let at_last = points.partition_point(|s| s.time < last);
                let after_last = points.partition_point(|s| s.time <= last);
                (at_last + self.taken_at_last).min(after_last)
            }
            None => 0,
        };
        let fresh = &points[start..];
        let Some(newest) = fresh.last().map(|s| s.time) else {
            return 0;
        };
        if self.last == Some(newest) {
            self.taken_at_last += fresh.len();
        } else {
            self.taken_at_last = fresh.iter().rev().take_while(|s| s.time == newest).count();
            self.last = Some(newest);
        }
        self.samples.extend(fresh.iter().copied());
        self.samples.make_contiguous();
        fresh.len()
    }

    /// Drop samples no window can reach any more.
    ///
    /// The newest `count` samples are always kept, and so is the newest sample
    /// at or before `now - millis` since it proves the duration window is covered.
    pub fn prune(&mut self, now: i64) {
        let horizon = now.saturating_sub(i64::try_from(self.retention.millis).unwrap_or(i64::MAX));
        while self.samples.len() > self.retention.count
            && self.samples.get(1).is_some_and(|next| next.time <= horizon)
        {
            self.samples.pop_front();
        }
        while self.samples.len() > MAX_RING_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.make_contiguous();
    }

    pub fn samples(&self) -> &[Sample] {
        self.samples.as_slices().0
    }
}
