//! Default call-path and color tables
//!
//! [`ColorTable`] assigns every procedure name a stable color: explicit
//! assignments win, everything else is hashed into a fixed palette so the
//! same trace always renders with the same colors.

use super::{Classification, Classifier};
use crate::types::{CallPathId, Color};
use std::collections::HashMap;

/// Palette used for procedures without an explicit color
const PALETTE: [Color; 16] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0xd6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0xe3, 0x77, 0xc2),
    Color::rgb(0x7f, 0x7f, 0x7f),
    Color::rgb(0xbc, 0xbd, 0x22),
    Color::rgb(0x17, 0xbe, 0xcf),
    Color::rgb(0xae, 0xc7, 0xe8),
    Color::rgb(0xff, 0xbb, 0x78),
    Color::rgb(0x98, 0xdf, 0x8a),
    Color::rgb(0xff, 0x98, 0x96),
    Color::rgb(0xc5, 0xb0, 0xd5),
    Color::rgb(0xc4, 0x9c, 0x94),
];

/// Procedure name to color mapping
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    assigned: HashMap<String, Color>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `name` to `color`
    pub fn assign(&mut self, name: impl Into<String>, color: Color) {
        self.assigned.insert(name.into(), color);
    }

    /// Color for a procedure name
    pub fn color_for(&self, name: &str) -> Color {
        if let Some(color) = self.assigned.get(name) {
            return *color;
        }
        PALETTE[(fnv1a(name.as_bytes()) % PALETTE.len() as u64) as usize]
    }
}

/// FNV-1a; stable across runs and platforms, unlike `DefaultHasher`
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

/// Call path id to procedure stack (outermost frame first)
#[derive(Debug, Clone, Default)]
pub struct CallPathTable {
    paths: HashMap<CallPathId, Vec<String>>,
    colors: ColorTable,
}

impl CallPathTable {
    pub fn new(colors: ColorTable) -> Self {
        Self {
            paths: HashMap::new(),
            colors,
        }
    }

    /// Register a call path; frames are listed from outermost to innermost
    pub fn insert<I, S>(&mut self, id: CallPathId, frames: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths
            .insert(id, frames.into_iter().map(Into::into).collect());
    }

    pub fn with_path<I, S>(mut self, id: CallPathId, frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(id, frames);
        self
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    /// Name of the procedure at `depth`, clamped to the innermost frame
    pub fn procedure_at(&self, id: CallPathId, depth: u32) -> Option<&str> {
        let frames = self.paths.get(&id)?;
        let level = (depth as usize).min(frames.len().checked_sub(1)?);
        Some(frames[level].as_str())
    }
}

impl Classifier for CallPathTable {
    fn classify(&self, call_path: CallPathId, depth: u32) -> Option<Classification> {
        let name = self.procedure_at(call_path, depth)?;
        let stack_depth = self.paths.get(&call_path)?.len() as u32;
        Some(Classification::new(stack_depth, self.colors.color_for(name)))
    }
}
