//! Mock construction helpers

use mockall::mock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracevis_rs::pipeline::ProgressSink;
use tracevis_rs::timeline::{SampleSource, SourceError, TimelineProvider};
use tracevis_rs::types::{LineIndex, Sample, TimeWindow, Timestamp};

mock! {
    pub Source {}

    impl SampleSource for Source {
        fn open(&mut self, window: TimeWindow) -> Result<(), SourceError>;
        fn sample_at(&mut self, time: Timestamp) -> Result<Option<Sample>, SourceError>;
        fn sample_count_in_window(&self) -> usize;
    }
}

mock! {
    pub Progress {}

    impl ProgressSink for Progress {
        fn report_one_unit_done(&self);
        fn is_canceled(&self) -> bool;
    }
}

/// Provider that builds each line's source with a closure
pub struct FnProvider<F> {
    lines: usize,
    make: F,
}

impl<F, S> FnProvider<F>
where
    F: Fn(LineIndex) -> Result<S, SourceError> + Sync,
    S: SampleSource,
{
    pub fn new(lines: usize, make: F) -> Self {
        Self { lines, make }
    }
}

impl<F, S> TimelineProvider for FnProvider<F>
where
    F: Fn(LineIndex) -> Result<S, SourceError> + Sync,
    S: SampleSource,
{
    type Source = S;

    fn line_count(&self) -> usize {
        self.lines
    }

    fn timeline(&self, line: LineIndex) -> Result<S, SourceError> {
        (self.make)(line)
    }
}

/// A mocked source that answers every probe with one distinct sample
///
/// Every `bogus_every`-th column returns a sample stamped before the window,
/// which the rasterizer must count as invalid. Columns are recovered from the
/// probe time, so the viewport must probe column starts (`use_midpoint = false`)
/// with a whole-number pixel length.
pub fn scripted_source(
    window: TimeWindow,
    pixel_length: Timestamp,
    bogus_every: Timestamp,
) -> MockSource {
    let mut source = MockSource::new();
    source.expect_open().returning(|_| Ok(()));
    source
        .expect_sample_count_in_window()
        .return_const((window.interval / pixel_length) as usize);
    source.expect_sample_at().returning(move |time| {
        let column = (time - window.begin) / pixel_length;
        let sample = if column % bogus_every == 0 {
            Sample::new(window.begin - 1 - column, 1)
        } else {
            Sample::new(time, (column / 10 % 3) as u32 + 1)
        };
        Ok(Some(sample))
    });
    source
}

/// A mocked source whose storage fails on the first read
pub fn failing_source() -> MockSource {
    let mut source = MockSource::new();
    source.expect_open().returning(|_| Ok(()));
    source.expect_sample_count_in_window().return_const(10usize);
    source
        .expect_sample_at()
        .returning(|_| Err(SourceError::Io(std::io::Error::other("trace file truncated"))));
    source
}

/// Progress sink that requests cancellation after `limit` completed lines
pub struct CancelAfter {
    limit: u64,
    done: AtomicU64,
}

impl CancelAfter {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            done: AtomicU64::new(0),
        }
    }

    pub fn completed(&self) -> u64 {
        self.done.load(Ordering::SeqCst)
    }
}

impl ProgressSink for CancelAfter {
    fn report_one_unit_done(&self) {
        self.done.fetch_add(1, Ordering::SeqCst);
    }

    fn is_canceled(&self) -> bool {
        self.done.load(Ordering::SeqCst) >= self.limit
    }
}
