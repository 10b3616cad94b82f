//! Timeline Worker Implementation
//!
//! This module contains the loop each worker thread runs. A worker claims
//! lines from the shared [`WorkDistributor`] until none remain, rasterizes
//! each one and publishes the result on the shared output channel.
//!
//! # Per-line Steps
//!
//! - **Height**: the row height policy sizes the line from its own index and
//!   the next one
//! - **Acquire**: the line's timeline is fetched from the provider and owned
//!   by this worker until the end of the iteration
//! - **Rasterize**: spans go to a fresh sink built by the caller's factory
//! - **Publish**: the real result, or the empty sentinel when the timeline
//!   has no data in the window
//! - **Progress**: one unit is reported, then cancellation is polled
//!
//! # Stopping
//!
//! The loop ends when the distributor runs dry, when the progress sink asks
//! for cancellation, when the consumer hangs up, or when another worker hit
//! a fatal source error. Results already published stay valid.

use crate::color::Classifier;
use crate::config::ViewportAttributes;
use crate::pipeline::distributor::WorkDistributor;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::progress::ProgressSink;
use crate::raster::{rendering_height_with_threshold, RasterError, Rasterizer, SpanSink};
use crate::timeline::TimelineProvider;
use crate::types::{LineIndex, LineResult};
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared, read-only state handed to every worker of one run
pub struct WorkerContext<'a, P: ?Sized, C: ?Sized, F: ?Sized, G: ?Sized> {
    pub provider: &'a P,
    pub classifier: &'a C,
    pub viewport: &'a ViewportAttributes,
    pub distributor: &'a WorkDistributor,
    pub make_sink: &'a F,
    pub progress: &'a G,
    /// Set by the first worker that hits a fatal error
    pub failed: &'a AtomicBool,
}

impl<P: ?Sized, C: ?Sized, F: ?Sized, G: ?Sized> Clone for WorkerContext<'_, P, C, F, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: ?Sized, C: ?Sized, F: ?Sized, G: ?Sized> Copy for WorkerContext<'_, P, C, F, G> {}

/// What one worker did over its lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    /// Invalid samples seen across all lines this worker processed
    pub invalid_samples: u64,
    /// Valid samples that went into spans
    pub valid_samples: u64,
    /// Lines delivered to the consumer, sentinels included
    pub lines_processed: u64,
    /// Lines published as the empty sentinel
    pub empty_lines: u64,
    /// Stopped early because of cancellation or a departed consumer
    pub canceled: bool,
}

/// One worker thread's share of a pipeline run
pub struct TimelineWorker<'a, P: ?Sized, C: ?Sized, F: ?Sized, G: ?Sized> {
    id: usize,
    ctx: WorkerContext<'a, P, C, F, G>,
    results: Sender<LineResult>,
}

impl<'a, P, C, F, G, K> TimelineWorker<'a, P, C, F, G>
where
    P: TimelineProvider + ?Sized,
    C: Classifier + ?Sized,
    F: Fn(LineIndex) -> K + Sync + ?Sized,
    G: ProgressSink + ?Sized,
    K: SpanSink,
{
    pub fn new(id: usize, ctx: WorkerContext<'a, P, C, F, G>, results: Sender<LineResult>) -> Self {
        Self { id, ctx, results }
    }

    /// Run the worker loop until there is nothing left to do
    ///
    /// Returns the worker's totals, or the first fatal source error.
    pub fn run(self) -> PipelineResult<WorkerReport> {
        tracing::debug!(worker = self.id, "Timeline worker started");

        let rasterizer = Rasterizer::new(self.ctx.viewport, self.ctx.classifier);
        let mut report = WorkerReport::default();

        loop {
            if self.ctx.progress.is_canceled() {
                report.canceled = true;
                break;
            }
            if self.ctx.failed.load(Ordering::SeqCst) {
                break;
            }
            let Some(line) = self.ctx.distributor.claim_next() else {
                break;
            };

            let result = match self.process_line(&rasterizer, line, &mut report) {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(worker = self.id, line = line.0, "Aborting run: {}", e);
                    self.ctx.failed.store(true, Ordering::SeqCst);
                    return Err(e);
                }
            };

            if self.results.send(result).is_err() {
                tracing::debug!(worker = self.id, "Result consumer disconnected");
                report.canceled = true;
                break;
            }
            report.lines_processed += 1;
            self.ctx.progress.report_one_unit_done();
        }

        tracing::debug!(
            worker = self.id,
            lines = report.lines_processed,
            invalid = report.invalid_samples,
            canceled = report.canceled,
            "Timeline worker stopped"
        );
        Ok(report)
    }

    /// Rasterize one line. The timeline is released when this returns.
    fn process_line(
        &self,
        rasterizer: &Rasterizer<'_, C>,
        line: LineIndex,
        report: &mut WorkerReport,
    ) -> PipelineResult<LineResult> {
        let viewport = self.ctx.viewport;
        let height = rendering_height_with_threshold(
            viewport.scale_y,
            line.0,
            line.next().0,
            viewport.separator_threshold,
        );

        let mut timeline = match self.ctx.provider.timeline(line) {
            Ok(timeline) => timeline,
            Err(e) if e.is_initialization_failure() => {
                tracing::trace!(line = line.0, "Timeline unavailable: {}", e);
                report.empty_lines += 1;
                return Ok(LineResult::empty(line, height));
            }
            Err(source) => return Err(PipelineError::Source { line, source }),
        };

        let mut sink = (self.ctx.make_sink)(line);
        match rasterizer.rasterize(&mut timeline, &mut sink) {
            Ok(outcome) => {
                report.invalid_samples += outcome.invalid_samples;
                report.valid_samples += outcome.valid_samples;
                tracing::trace!(
                    line = line.0,
                    spans = outcome.spans,
                    invalid = outcome.invalid_samples,
                    "Line rasterized"
                );
                Ok(LineResult::new(line, height, sink.into_spans()))
            }
            Err(RasterError::Initialization(e)) => {
                tracing::trace!(line = line.0, "Empty line: {}", e);
                report.empty_lines += 1;
                Ok(LineResult::empty(line, height))
            }
            Err(RasterError::Source(source)) => Err(PipelineError::Source { line, source }),
        }
    }
}
