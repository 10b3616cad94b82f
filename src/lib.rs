//! # TraceVis-RS: Execution Trace Timeline Rasterizer
//!
//! Turns sampled execution traces (one timeline of call-path samples per
//! process or thread) into rows of colored pixel spans, ready for a trace
//! viewer to paint. Lines are rasterized concurrently by a pool of workers
//! that share an atomic work distributor and publish results on a channel.
//!
//! ## Architecture
//!
//! - **Timeline**: sample sources, one per line, behind the [`timeline::SampleSource`] trait
//! - **Color**: call-path classification to stack depth and color
//! - **Raster**: the per-line column algorithm and the row height policy
//! - **Pipeline**: work distribution, the worker loop and run orchestration
//!
//! ## Configuration
//!
//! Render defaults are stored in the platform-appropriate config directory
//! under `dev.tracevis-rs/render.toml`; see [`config`].
//!
//! ## Example
//!
//! ```ignore
//! use tracevis_rs::{
//!     config::ViewportAttributes,
//!     pipeline::{collect_ordered, NoProgress, RasterPipeline},
//!     raster::DetailSink,
//!     timeline::synthetic::SyntheticTrace,
//!     types::TimeWindow,
//! };
//!
//! let trace = SyntheticTrace::new(64, 10_000);
//! let (database, call_paths) = trace.build();
//! let viewport = ViewportAttributes::new(TimeWindow::new(0, trace.duration()), 1920, 4.0);
//!
//! let outcome = RasterPipeline::new(viewport, 0)
//!     .run(&database, &call_paths, |_| DetailSink::new(), &NoProgress)?;
//! for line in collect_ordered(&outcome.results) {
//!     println!("{} -> {} spans", line.line, line.spans().len());
//! }
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod raster;
pub mod timeline;
pub mod types;

// Re-export commonly used types
pub use color::{CallPathTable, Classification, Classifier, ColorTable};
pub use config::{RenderConfig, ViewportAttributes};
pub use error::{Result, TraceVisError};
pub use pipeline::{
    PipelineError, PipelineHandle, PipelineOutcome, PipelineSummary, ProgressSink,
    ProgressTracker, RasterPipeline,
};
pub use raster::{rendering_height, Rasterizer, SpanSink};
pub use timeline::{SampleSource, SourceError, TimelineProvider};
pub use types::{Color, LineIndex, LineResult, PixelSpan, Sample, TimeWindow};
