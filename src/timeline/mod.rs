//! Sample source interfaces
//!
//! The rasterizer never reads trace files itself. It sees each process
//! timeline through the [`SampleSource`] trait, and the pipeline obtains one
//! source per line from a [`TimelineProvider`]. Implementations must be
//! `Send` so a worker thread can own its timeline for the duration of a line.
//!
//! # Example
//!
//! ```ignore
//! fn first_sample(source: &mut dyn SampleSource, window: TimeWindow) -> Option<Sample> {
//!     source.open(window).ok()?;
//!     source.sample_at(window.begin).ok().flatten()
//! }
//! ```

pub mod memory;
pub mod synthetic;

pub use memory::{MemoryTimeline, MemoryTraceDatabase};

use crate::types::{LineIndex, Sample, TimeWindow, Timestamp};
use thiserror::Error;

/// Errors reported by a sample source
#[derive(Error, Debug)]
pub enum SourceError {
    /// The requested window contains no samples
    #[error("No samples in window [{begin}, {end})")]
    NoSamples { begin: Timestamp, end: Timestamp },

    /// The timeline could not be positioned in the requested window
    #[error("Timeline could not be positioned: {0}")]
    Unpositioned(String),

    /// The provider has no timeline for this line
    #[error("Line {line} out of range ({count} lines)")]
    LineOutOfRange { line: LineIndex, count: usize },

    /// IO errors from the underlying storage
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// True when the line should degrade to an empty result instead of failing the run
    pub fn is_initialization_failure(&self) -> bool {
        matches!(
            self,
            SourceError::NoSamples { .. } | SourceError::Unpositioned(_)
        )
    }
}

/// Ordered, random access to one process's time-ordered samples
pub trait SampleSource: Send {
    /// Position the timeline on `window`
    ///
    /// Fails with [`SourceError::NoSamples`] when nothing falls in range.
    fn open(&mut self, window: TimeWindow) -> Result<(), SourceError>;

    /// The nearest sample at or before `time`, if any
    fn sample_at(&mut self, time: Timestamp) -> Result<Option<Sample>, SourceError>;

    /// Number of samples inside the opened window
    fn sample_count_in_window(&self) -> usize;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn open(&mut self, window: TimeWindow) -> Result<(), SourceError> {
        (**self).open(window)
    }

    fn sample_at(&mut self, time: Timestamp) -> Result<Option<Sample>, SourceError> {
        (**self).sample_at(time)
    }

    fn sample_count_in_window(&self) -> usize {
        (**self).sample_count_in_window()
    }
}

/// Hands out one [`SampleSource`] per line
///
/// Shared by all workers, so implementations must be `Sync`. Each call
/// returns a fresh handle that the calling worker owns exclusively.
pub trait TimelineProvider: Sync {
    type Source: SampleSource;

    /// Total number of lines available
    fn line_count(&self) -> usize;

    /// Acquire the timeline for `line`
    fn timeline(&self, line: LineIndex) -> Result<Self::Source, SourceError>;
}
