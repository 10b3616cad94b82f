//! Call-path classification and coloring
//!
//! The rasterizer asks a [`Classifier`] what each sampled call path looks like
//! at the depth of interest: which color to paint it and how deep its stack
//! is. Classification is a pure lookup and is called concurrently from every
//! worker, so implementations must be `Sync` and free of side effects.
//!
//! The default implementation pairs a [`CallPathTable`] (call path id to
//! stack of procedure names) with a [`ColorTable`] (procedure name to color).

pub mod table;

pub use table::{CallPathTable, ColorTable};

use crate::types::{CallPathId, Color};

/// What a call path resolves to at the depth of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Classification {
    /// Stack depth of the call path
    pub depth: u32,
    /// Color of the procedure at the depth of interest
    pub color: Color,
}

impl Classification {
    pub fn new(depth: u32, color: Color) -> Self {
        Self { depth, color }
    }
}

/// Resolves call paths to classifications
pub trait Classifier: Sync {
    /// Classify `call_path` at `depth`; `None` when the call path is unknown
    fn classify(&self, call_path: CallPathId, depth: u32) -> Option<Classification>;
}

impl<F> Classifier for F
where
    F: Fn(CallPathId, u32) -> Option<Classification> + Sync,
{
    fn classify(&self, call_path: CallPathId, depth: u32) -> Option<Classification> {
        self(call_path, depth)
    }
}
