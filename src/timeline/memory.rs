//! In-memory sample sources
//!
//! [`MemoryTraceDatabase`] keeps every line's samples in memory and hands out
//! cheap [`MemoryTimeline`] handles that share the underlying storage. It is
//! used by the demo binary, the benchmarks and the tests, and is suitable for
//! embedding when traces have already been decoded by the caller.

use super::{SampleSource, SourceError, TimelineProvider};
use crate::types::{LineIndex, Sample, TimeWindow, Timestamp};
use std::ops::Range;
use std::sync::Arc;

/// A handle over one line's samples
#[derive(Debug, Clone)]
pub struct MemoryTimeline {
    samples: Arc<[Sample]>,
    /// Index range of the opened window; `None` until `open` succeeds
    range: Option<Range<usize>>,
}

impl MemoryTimeline {
    /// Create a timeline from samples, sorting them by timestamp
    pub fn new(mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self::from_shared(samples.into())
    }

    fn from_shared(samples: Arc<[Sample]>) -> Self {
        Self {
            samples,
            range: None,
        }
    }

    /// Total samples regardless of window
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn window_slice(&self) -> Result<&[Sample], SourceError> {
        match &self.range {
            Some(range) => Ok(&self.samples[range.clone()]),
            None => Err(SourceError::Unpositioned(
                "timeline has not been opened".to_string(),
            )),
        }
    }
}

impl SampleSource for MemoryTimeline {
    fn open(&mut self, window: TimeWindow) -> Result<(), SourceError> {
        let lo = self.samples.partition_point(|s| s.timestamp < window.begin);
        let hi = self.samples.partition_point(|s| s.timestamp < window.end());

        if lo >= hi {
            self.range = None;
            return Err(SourceError::NoSamples {
                begin: window.begin,
                end: window.end(),
            });
        }

        self.range = Some(lo..hi);
        Ok(())
    }

    fn sample_at(&mut self, time: Timestamp) -> Result<Option<Sample>, SourceError> {
        let slice = self.window_slice()?;
        let idx = slice.partition_point(|s| s.timestamp <= time);
        Ok(idx.checked_sub(1).map(|i| slice[i]))
    }

    fn sample_count_in_window(&self) -> usize {
        self.range.as_ref().map_or(0, |r| r.len())
    }
}

/// All lines of a trace held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryTraceDatabase {
    lines: Vec<Arc<[Sample]>>,
}

impl MemoryTraceDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line; samples are sorted by timestamp. Returns its index.
    ///
    /// Returns `None` and drops the line once the `u32` index space is full.
    pub fn push_line(&mut self, mut samples: Vec<Sample>) -> Option<LineIndex> {
        let Some(line) = next_line_index(self.lines.len()) else {
            tracing::warn!("Line index space exhausted, dropping line");
            return None;
        };
        samples.sort_by_key(|s| s.timestamp);
        self.lines.push(samples.into());
        Some(line)
    }

    /// Builder-style variant of [`push_line`](Self::push_line)
    pub fn with_line(mut self, samples: Vec<Sample>) -> Self {
        self.push_line(samples);
        self
    }

    /// Earliest and latest timestamp across all lines
    pub fn time_bounds(&self) -> Option<(Timestamp, Timestamp)> {
        self.lines
            .iter()
            .filter_map(|line| Some((line.first()?.timestamp, line.last()?.timestamp)))
            .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)))
    }

    /// Total samples across all lines
    pub fn total_samples(&self) -> usize {
        self.lines.iter().map(|l| l.len()).sum()
    }
}

impl TimelineProvider for MemoryTraceDatabase {
    type Source = MemoryTimeline;

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn timeline(&self, line: LineIndex) -> Result<MemoryTimeline, SourceError> {
        self.lines
            .get(line.index())
            .map(|samples| MemoryTimeline::from_shared(Arc::clone(samples)))
            .ok_or(SourceError::LineOutOfRange {
                line,
                count: self.lines.len(),
            })
    }
}

fn next_line_index(len: usize) -> Option<LineIndex> {
    u32::try_from(len).ok().map(LineIndex)
}
