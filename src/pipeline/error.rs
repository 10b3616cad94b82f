//! Pipeline-specific error types.

use crate::timeline::SourceError;
use crate::types::LineIndex;
use thiserror::Error;

/// Errors that fail a whole pipeline run.
///
/// Per-line problems never show up here: lines without data become empty
/// results and bad samples are only counted.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Line {line} sample source error: {source}")]
    Source {
        line: LineIndex,
        #[source]
        source: SourceError,
    },

    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),

    #[error("{0} lines exceed the line index range")]
    TooManyLines(usize),

    #[error("Worker thread panicked")]
    WorkerPanicked,

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
