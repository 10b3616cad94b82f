//! Pipeline executor: spawns the worker pool and gathers its totals.
//!
//! A run:
//! 1. Validates the viewport and sizes the pool (never more workers than lines).
//! 2. Starts the workers, which share one distributor and one output channel.
//! 3. Joins every worker, summing invalid samples and noting cancellation.
//! 4. Fails with the first fatal source error, if any worker hit one.
//!
//! [`RasterPipeline::run`] blocks until the pool finishes and hands back an
//! unbounded receiver holding every result. [`RasterPipeline::spawn`] returns
//! immediately with a bounded receiver so results can be painted while the
//! pool is still working.

use crate::color::Classifier;
use crate::config::{
    RenderConfig, ViewportAttributes, DEFAULT_INVALID_WARNING_RATIO, DEFAULT_QUEUE_CAPACITY,
};
use crate::pipeline::distributor::WorkDistributor;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::progress::ProgressSink;
use crate::pipeline::worker::{TimelineWorker, WorkerContext, WorkerReport};
use crate::raster::SpanSink;
use crate::timeline::TimelineProvider;
use crate::types::{LineIndex, LineResult};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

/// Totals of a finished (or stopped) run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Invalid samples summed across all workers
    pub total_invalid_samples: u64,
    /// Valid samples summed across all workers
    pub total_valid_samples: u64,
    /// Results published, sentinels included
    pub lines_published: u64,
    /// Results published as the empty sentinel
    pub empty_lines: u64,
    /// Total lines the run was asked to render
    pub line_count: u64,
    /// Worker threads used
    pub workers: usize,
    /// The run stopped before every line was published
    pub was_canceled: bool,
}

impl PipelineSummary {
    /// Share of examined samples that were invalid
    pub fn invalid_ratio(&self) -> f64 {
        let total = self.total_invalid_samples + self.total_valid_samples;
        if total == 0 {
            0.0
        } else {
            self.total_invalid_samples as f64 / total as f64
        }
    }

    fn absorb(&mut self, report: &WorkerReport) {
        self.total_invalid_samples += report.invalid_samples;
        self.total_valid_samples += report.valid_samples;
        self.lines_published += report.lines_processed;
        self.empty_lines += report.empty_lines;
        self.was_canceled |= report.canceled;
    }
}

/// Result of a blocking run: every published line plus the run totals
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Published results, in arrival order (not line order)
    pub results: Receiver<LineResult>,
    pub summary: PipelineSummary,
}

impl PipelineOutcome {
    pub fn total_invalid_samples(&self) -> u64 {
        self.summary.total_invalid_samples
    }

    pub fn was_canceled(&self) -> bool {
        self.summary.was_canceled
    }
}

/// A run executing in the background
pub struct PipelineHandle {
    results: Receiver<LineResult>,
    handle: JoinHandle<PipelineResult<PipelineSummary>>,
}

impl PipelineHandle {
    /// Results as they are published; drain this before joining
    pub fn results(&self) -> &Receiver<LineResult> {
        &self.results
    }

    /// Wait for the pool to finish
    ///
    /// Dropping the receiver first makes the remaining workers stop.
    pub fn join(self) -> PipelineResult<PipelineSummary> {
        let PipelineHandle { results, handle } = self;
        drop(results);
        handle.join().map_err(|_| PipelineError::WorkerPanicked)?
    }

    /// Drain every result and wait for the pool to finish
    pub fn collect(self) -> PipelineResult<(Vec<LineResult>, PipelineSummary)> {
        let collected: Vec<LineResult> = self.results.iter().collect();
        let summary = self.join()?;
        Ok((collected, summary))
    }
}

/// Concurrent rasterizer for a fixed viewport
#[derive(Debug, Clone)]
pub struct RasterPipeline {
    viewport: ViewportAttributes,
    workers: usize,
    queue_capacity: usize,
    invalid_warning_ratio: f64,
}

impl RasterPipeline {
    /// Create a pipeline with `workers` threads (0 = available parallelism)
    pub fn new(viewport: ViewportAttributes, workers: usize) -> Self {
        Self {
            viewport,
            workers,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            invalid_warning_ratio: DEFAULT_INVALID_WARNING_RATIO,
        }
    }

    /// Create a pipeline using the pool settings of a [`RenderConfig`]
    pub fn from_config(config: &RenderConfig, viewport: ViewportAttributes) -> Self {
        Self {
            viewport,
            workers: config.workers,
            queue_capacity: config.queue_capacity.max(1),
            invalid_warning_ratio: config.invalid_warning_ratio,
        }
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn viewport(&self) -> &ViewportAttributes {
        &self.viewport
    }

    fn worker_count(&self, line_count: usize) -> usize {
        RenderConfig {
            workers: self.workers,
            ..Default::default()
        }
        .effective_workers(line_count)
    }

    /// Rasterize every line of `provider`, blocking until the pool is done
    pub fn run<P, C, F, K, G>(
        &self,
        provider: &P,
        classifier: &C,
        make_sink: F,
        progress: &G,
    ) -> PipelineResult<PipelineOutcome>
    where
        P: TimelineProvider + ?Sized,
        C: Classifier + ?Sized,
        F: Fn(LineIndex) -> K + Sync,
        K: SpanSink,
        G: ProgressSink + ?Sized,
    {
        let (tx, rx) = unbounded();
        let summary = self.execute(provider, classifier, &make_sink, progress, tx)?;
        Ok(PipelineOutcome {
            results: rx,
            summary,
        })
    }

    /// Start the run on a background thread and stream results as they come
    pub fn spawn<P, C, F, K, G>(
        self,
        provider: Arc<P>,
        classifier: Arc<C>,
        make_sink: F,
        progress: Arc<G>,
    ) -> PipelineResult<PipelineHandle>
    where
        P: TimelineProvider + Send + 'static,
        C: Classifier + Send + 'static,
        F: Fn(LineIndex) -> K + Send + Sync + 'static,
        K: SpanSink + 'static,
        G: ProgressSink + Send + 'static,
    {
        let (tx, rx) = bounded(self.queue_capacity);
        let handle = std::thread::Builder::new()
            .name("tracevis-pipeline".to_string())
            .spawn(move || self.execute(&*provider, &*classifier, &make_sink, &*progress, tx))?;

        Ok(PipelineHandle {
            results: rx,
            handle,
        })
    }

    fn execute<P, C, F, K, G>(
        &self,
        provider: &P,
        classifier: &C,
        make_sink: &F,
        progress: &G,
        results: Sender<LineResult>,
    ) -> PipelineResult<PipelineSummary>
    where
        P: TimelineProvider + ?Sized,
        C: Classifier + ?Sized,
        F: Fn(LineIndex) -> K + Sync,
        K: SpanSink,
        G: ProgressSink + ?Sized,
    {
        self.viewport
            .validate()
            .map_err(PipelineError::InvalidViewport)?;

        let line_count = provider.line_count();
        let total =
            u32::try_from(line_count).map_err(|_| PipelineError::TooManyLines(line_count))?;
        let workers = self.worker_count(line_count);

        let mut summary = PipelineSummary {
            line_count: line_count as u64,
            workers,
            ..Default::default()
        };

        if line_count == 0 {
            tracing::debug!("Nothing to rasterize");
            return Ok(summary);
        }

        tracing::info!(
            lines = line_count,
            workers,
            pixels = self.viewport.pixels_h,
            "Starting raster pipeline"
        );
        let started = Instant::now();

        let distributor = WorkDistributor::new(total);
        let failed = AtomicBool::new(false);
        let ctx = WorkerContext {
            provider,
            classifier,
            viewport: &self.viewport,
            distributor: &distributor,
            make_sink,
            progress,
            failed: &failed,
        };

        let outcomes: Vec<PipelineResult<WorkerReport>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|id| {
                    let worker = TimelineWorker::new(id, ctx, results.clone());
                    std::thread::Builder::new()
                        .name(format!("tracevis-worker-{}", id))
                        .spawn_scoped(scope, move || worker.run())
                })
                .collect();
            // Only the workers may keep the channel open
            drop(results);

            handles
                .into_iter()
                .map(|handle| match handle {
                    Ok(handle) => handle.join().unwrap_or(Err(PipelineError::WorkerPanicked)),
                    Err(e) => Err(PipelineError::Spawn(e)),
                })
                .collect()
        });

        let mut first_error = None;
        for outcome in outcomes {
            match outcome {
                Ok(report) => summary.absorb(&report),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        // A cancel that lands after the last line still counts
        if summary.lines_published < summary.line_count {
            summary.was_canceled = true;
        }

        let ratio = summary.invalid_ratio();
        if ratio > self.invalid_warning_ratio {
            tracing::warn!(
                "{} of {} samples were invalid ({:.1}%)",
                summary.total_invalid_samples,
                summary.total_invalid_samples + summary.total_valid_samples,
                ratio * 100.0
            );
        }

        tracing::info!(
            published = summary.lines_published,
            empty = summary.empty_lines,
            invalid = summary.total_invalid_samples,
            canceled = summary.was_canceled,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Raster pipeline finished"
        );

        Ok(summary)
    }
}
