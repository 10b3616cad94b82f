//! Rasterization of one process timeline into pixel spans
//!
//! For every horizontal pixel column the rasterizer probes the timeline at
//! the column start (or its temporal midpoint when `use_midpoint` is set) and
//! takes the nearest sample at or before that time. Adjacent columns whose
//! samples classify to the same color are merged into one span, and the sink
//! is told about each span as soon as the color changes.
//!
//! # Invalid Samples
//!
//! A sample is invalid when its timestamp lies outside the viewport window,
//! when it is older than the last accepted sample, or when its call path
//! cannot be classified. Invalid samples are counted and skipped; they never
//! start, end or count towards a span, and they never fail the line.
//!
//! # Coverage
//!
//! Columns between two accepted samples (columns with no new sample, or with
//! an invalid one) belong to the span on their left. Columns before the first
//! accepted sample are left unpainted, as are trailing columns whose probes
//! only turn up invalid samples.

pub mod row_height;
pub mod sink;

pub use row_height::{rendering_height, rendering_height_with_threshold};
pub use sink::{DepthSink, DetailSink, SpanSink, ViewSink};

use crate::color::{Classification, Classifier};
use crate::config::ViewportAttributes;
use crate::timeline::{SampleSource, SourceError};
use crate::types::{Color, Sample, Timestamp};
use thiserror::Error;

/// Why a line could not be rasterized
#[derive(Error, Debug)]
pub enum RasterError {
    /// The timeline has no usable samples in the window; the line is empty
    #[error("Timeline initialization failed: {0}")]
    Initialization(#[source] SourceError),

    /// The sample source itself failed
    #[error("Sample source failed: {0}")]
    Source(#[source] SourceError),
}

/// Counters from rasterizing one line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterOutcome {
    /// Distinct samples rejected during the line
    pub invalid_samples: u64,
    /// Distinct samples that contributed to spans
    pub valid_samples: u64,
    /// Spans handed to the sink
    pub spans: u32,
}

/// A run of columns being accumulated into a span
#[derive(Debug, Clone, Copy)]
struct Run {
    start: u32,
    end: u32,
    depth: u32,
    color: Color,
    samples: u32,
}

/// Converts timelines into spans for a fixed viewport
pub struct Rasterizer<'a, C: Classifier + ?Sized> {
    viewport: &'a ViewportAttributes,
    classifier: &'a C,
}

impl<'a, C: Classifier + ?Sized> Rasterizer<'a, C> {
    pub fn new(viewport: &'a ViewportAttributes, classifier: &'a C) -> Self {
        Self {
            viewport,
            classifier,
        }
    }

    /// Rasterize `source` into `sink`
    ///
    /// Returns [`RasterError::Initialization`] when the timeline has nothing
    /// in the window; the caller publishes an empty line in that case.
    pub fn rasterize<S, K>(&self, source: &mut S, sink: &mut K) -> Result<RasterOutcome, RasterError>
    where
        S: SampleSource + ?Sized,
        K: SpanSink,
    {
        let window = self.viewport.window;
        source.open(window).map_err(|e| {
            if e.is_initialization_failure() {
                RasterError::Initialization(e)
            } else {
                RasterError::Source(e)
            }
        })?;

        if source.sample_count_in_window() == 0 {
            return Err(RasterError::Initialization(SourceError::NoSamples {
                begin: window.begin,
                end: window.end(),
            }));
        }

        let mut outcome = RasterOutcome::default();
        let mut run: Option<Run> = None;
        let mut previous: Option<Sample> = None;
        let mut previous_valid = false;
        let mut last_accepted: Option<Timestamp> = None;

        for column in 0..self.viewport.pixels_h {
            let time = self.viewport.probe_time(column);
            let Some(sample) = source.sample_at(time).map_err(RasterError::Source)? else {
                continue;
            };

            // Same sample as the previous column
            if previous == Some(sample) {
                if previous_valid {
                    if let Some(current) = run.as_mut() {
                        current.end = column + 1;
                    }
                }
                continue;
            }
            previous = Some(sample);

            let Some(class) = self.accept(sample, last_accepted) else {
                outcome.invalid_samples += 1;
                previous_valid = false;
                continue;
            };
            previous_valid = true;
            last_accepted = Some(sample.timestamp);
            outcome.valid_samples += 1;

            match run.as_mut() {
                Some(current) if current.color == class.color => {
                    current.end = column + 1;
                    current.samples += 1;
                }
                _ => {
                    if let Some(done) = run.take() {
                        Self::emit(sink, &mut outcome, done, column);
                    }
                    run = Some(Run {
                        start: column,
                        end: column + 1,
                        depth: class.depth,
                        color: class.color,
                        samples: 1,
                    });
                }
            }
        }

        if let Some(done) = run {
            Self::emit(sink, &mut outcome, done, done.end);
        }

        Ok(outcome)
    }

    /// Classify `sample`, or `None` if it must be counted as invalid
    fn accept(&self, sample: Sample, last_accepted: Option<Timestamp>) -> Option<Classification> {
        if !self.viewport.window.contains(sample.timestamp) {
            return None;
        }
        if last_accepted.is_some_and(|last| sample.timestamp < last) {
            return None;
        }
        self.classifier
            .classify(sample.call_path, self.viewport.depth)
    }

    fn emit<K: SpanSink>(sink: &mut K, outcome: &mut RasterOutcome, run: Run, end: u32) {
        sink.finish_line(run.start, end, run.depth, run.color, run.samples);
        outcome.spans += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Classification;
    use crate::timeline::MemoryTimeline;
    use crate::types::{CallPathId, PixelSpan, TimeWindow};
    use proptest::prelude::*;

    fn palette(cp: CallPathId) -> Color {
        Color::rgb(cp as u8, 0, 0)
    }

    fn classifier(cp: CallPathId, _depth: u32) -> Option<Classification> {
        (cp < 100).then(|| Classification::new(cp + 1, palette(cp)))
    }

    fn viewport(pixels: u32, midpoint: bool) -> ViewportAttributes {
        ViewportAttributes::new(TimeWindow::new(0, pixels as i64 * 10), pixels, 4.0)
            .with_midpoint(midpoint)
    }

    fn run(vp: &ViewportAttributes, samples: Vec<Sample>) -> (Vec<PixelSpan>, RasterOutcome) {
        let mut source = MemoryTimeline::new(samples);
        let mut sink = DetailSink::new();
        let outcome = Rasterizer::new(vp, &classifier)
            .rasterize(&mut source, &mut sink)
            .unwrap();
        (sink.into_spans(), outcome)
    }

    #[test]
    fn test_merges_columns_with_same_color() {
        let vp = viewport(10, false);
        let (spans, outcome) = run(
            &vp,
            vec![
                Sample::new(0, 1),
                Sample::new(20, 1),
                Sample::new(40, 2),
                Sample::new(70, 1),
            ],
        );

        assert_eq!(spans.len(), 3);
        assert_eq!((spans[0].start, spans[0].end), (0, 4));
        assert_eq!(spans[0].sample_count, Some(2));
        assert_eq!(spans[0].color, palette(1));
        assert_eq!((spans[1].start, spans[1].end), (4, 7));
        assert_eq!((spans[2].start, spans[2].end), (7, 10));
        assert_eq!(spans[2].depth, 2);
        assert_eq!(outcome.valid_samples, 4);
        assert_eq!(outcome.invalid_samples, 0);
        assert_eq!(outcome.spans, 3);
    }

    #[test]
    fn test_midpoint_changes_attribution() {
        // A sample at 15 lands inside column 1 (10..20)
        let samples = vec![Sample::new(0, 1), Sample::new(15, 2)];

        let (start_spans, _) = run(&viewport(4, false), samples.clone());
        assert_eq!((start_spans[0].start, start_spans[0].end), (0, 2));
        assert_eq!(start_spans[1].start, 2);

        let (mid_spans, _) = run(&viewport(4, true), samples);
        assert_eq!((mid_spans[0].start, mid_spans[0].end), (0, 1));
        assert_eq!(mid_spans[1].start, 1);
    }

    #[test]
    fn test_leading_columns_without_samples_are_skipped() {
        let vp = viewport(10, false);
        let (spans, outcome) = run(&vp, vec![Sample::new(55, 3)]);

        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (6, 10));
        assert_eq!(spans[0].sample_count, Some(1));
        assert_eq!(outcome.valid_samples, 1);
    }

    #[test]
    fn test_unclassifiable_samples_are_counted_not_drawn() {
        let vp = viewport(6, false);
        let (spans, outcome) = run(
            &vp,
            vec![
                Sample::new(0, 1),
                Sample::new(20, 500),
                Sample::new(30, 1),
                Sample::new(50, 2),
            ],
        );

        assert_eq!(outcome.invalid_samples, 1);
        assert_eq!(outcome.valid_samples, 3);
        // The invalid sample does not break the run of color 1
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].start, spans[0].end), (0, 5));
        assert_eq!(spans[0].sample_count, Some(2));
    }

    #[test]
    fn test_empty_window_is_an_initialization_failure() {
        let vp = viewport(10, true);
        let mut source = MemoryTimeline::new(vec![Sample::new(500, 1)]);
        let mut sink = DetailSink::new();

        let err = Rasterizer::new(&vp, &classifier)
            .rasterize(&mut source, &mut sink)
            .unwrap_err();
        assert!(matches!(err, RasterError::Initialization(_)));
        assert!(sink.into_spans().is_empty());
    }

    #[test]
    fn test_depth_sink_has_no_counts() {
        let vp = viewport(4, true);
        let mut source = MemoryTimeline::new(vec![Sample::new(0, 1), Sample::new(20, 2)]);
        let mut sink = DepthSink::new();
        Rasterizer::new(&vp, &classifier)
            .rasterize(&mut source, &mut sink)
            .unwrap();
        assert!(sink.into_spans().iter().all(|s| s.sample_count.is_none()));
    }

    proptest! {
        #[test]
        fn test_spans_are_sorted_and_disjoint(
            mut times in prop::collection::vec(0i64..10_000, 1..200),
            paths in prop::collection::vec(0u32..120, 200),
            pixels in 1u32..400,
            midpoint in any::<bool>(),
        ) {
            times.sort_unstable();
            times.dedup();
            let samples: Vec<Sample> = times
                .iter()
                .zip(paths.iter())
                .map(|(&t, &cp)| Sample::new(t, cp))
                .collect();

            let vp = ViewportAttributes::new(TimeWindow::new(0, 10_000), pixels, 4.0)
                .with_midpoint(midpoint);
            let mut source = MemoryTimeline::new(samples.clone());
            let mut sink = DetailSink::new();
            let outcome = Rasterizer::new(&vp, &classifier)
                .rasterize(&mut source, &mut sink)
                .unwrap();
            let spans = sink.into_spans();

            for span in &spans {
                prop_assert!(span.start < span.end);
                prop_assert!(span.end <= pixels);
            }
            for pair in spans.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start);
                prop_assert_ne!(pair[0].color, pair[1].color);
            }

            let counted: u64 = spans.iter().map(|s| s.sample_count.unwrap_or(0) as u64).sum();
            prop_assert_eq!(counted, outcome.valid_samples);
            prop_assert!(outcome.valid_samples + outcome.invalid_samples <= samples.len() as u64);
        }
    }
}
