//! Concurrent raster pipeline.
//!
//! A fixed pool of worker threads pulls line indices from a shared atomic
//! distributor, rasterizes each line's timeline, and publishes the results on
//! a crossbeam channel. The consumer reorders results by their embedded line
//! index; arrival order carries no meaning.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─► [TimelineWorker 0] ─┐
//! [WorkDistributor] ─┼─► [TimelineWorker 1] ─┼─► channel ─► [LineTable / painter]
//!                    └─► [TimelineWorker N] ─┘
//! ```
//!
//! # Design
//!
//! - **Exactly once**: the distributor's atomic counter is the only
//!   coordination between workers besides the channel.
//! - **Static dispatch**: workers are generic over the provider, classifier,
//!   span sink and progress sink; no trait objects on the hot path.
//! - **Scoped timelines**: each line's timeline is acquired and released
//!   inside one iteration, on every exit path.
//! - **Cooperative cancellation**: polled at line boundaries only.

pub mod aggregate;
pub mod distributor;
pub mod error;
pub mod executor;
pub mod progress;
pub mod worker;

pub use aggregate::{collect_ordered, LineTable};
pub use distributor::WorkDistributor;
pub use error::{PipelineError, PipelineResult};
pub use executor::{PipelineHandle, PipelineOutcome, PipelineSummary, RasterPipeline};
pub use progress::{NoProgress, ProgressSink, ProgressTracker};
pub use worker::{TimelineWorker, WorkerContext, WorkerReport};
