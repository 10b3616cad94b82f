//! Error handling for the TraceVis-RS crate
//!
//! This module defines the crate-wide error type and a Result alias. The
//! rasterization pipeline has its own narrower error type in
//! [`crate::pipeline::error`] which converts into [`TraceVisError`].

use crate::pipeline::PipelineError;
use thiserror::Error;

/// Main error type for TraceVis-RS operations
#[derive(Error, Debug)]
pub enum TraceVisError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors raised by the rasterization pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TraceVisError>,
    },
}

impl TraceVisError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TraceVisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for TraceVis-RS operations
pub type Result<T> = std::result::Result<T, TraceVisError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<TraceVisError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
