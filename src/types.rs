//! Core data types for TraceVis-RS
//!
//! This module contains the fundamental data structures shared by the
//! rasterizer and the worker pipeline.
//!
//! # Main Types
//!
//! - [`LineIndex`] - Identity of one process/thread timeline
//! - [`Sample`] - A single (timestamp, call path) record from a trace
//! - [`TimeWindow`] - The half-open time range being rendered
//! - [`Color`] - RGBA color assigned to a classification
//! - [`PixelSpan`] - A contiguous run of pixel columns sharing one color
//! - [`LineResult`] - All spans for one line, or the empty sentinel
//!
//! # Sentinel Results
//!
//! A line whose timeline could not be positioned in the requested window is
//! published as [`LineResult::empty`]. This is distinct from a valid result
//! that happens to contain zero spans: the sentinel means "no data", a zero
//! span result means "data, but nothing to draw".

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trace time in the trace's native units (typically nanoseconds)
pub type Timestamp = i64;

/// Identifier of a call path in the experiment's call-path table
pub type CallPathId = u32;

/// Index of one process/thread timeline among all lines being rendered
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct LineIndex(pub u32);

impl LineIndex {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The line directly below this one
    #[inline]
    pub fn next(self) -> LineIndex {
        LineIndex(self.0.saturating_add(1))
    }
}

impl fmt::Debug for LineIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineIndex({})", self.0)
    }
}

impl fmt::Display for LineIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single trace record: at `timestamp` the process was executing `call_path`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: Timestamp,
    pub call_path: CallPathId,
}

impl Sample {
    pub fn new(timestamp: Timestamp, call_path: CallPathId) -> Self {
        Self {
            timestamp,
            call_path,
        }
    }
}

/// Half-open time range `[begin, begin + interval)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub begin: Timestamp,
    pub interval: Timestamp,
}

impl TimeWindow {
    pub fn new(begin: Timestamp, interval: Timestamp) -> Self {
        Self { begin, interval }
    }

    /// Build a window from explicit bounds; reversed bounds give an empty window
    pub fn from_bounds(begin: Timestamp, end: Timestamp) -> Self {
        Self {
            begin,
            interval: end.saturating_sub(begin).max(0),
        }
    }

    /// Exclusive end of the window
    #[inline]
    pub fn end(&self) -> Timestamp {
        self.begin.saturating_add(self.interval)
    }

    #[inline]
    pub fn contains(&self, time: Timestamp) -> bool {
        time >= self.begin && time < self.end()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.interval <= 0
    }
}

/// RGBA color with 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack into `0xRRGGBBAA`
    pub fn to_u32(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// A contiguous run of pixel columns `[start, end)` painted with one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelSpan {
    /// First pixel column covered
    pub start: u32,
    /// One past the last pixel column covered
    pub end: u32,
    /// Call-path depth of the first sample in the span
    pub depth: u32,
    pub color: Color,
    /// Number of distinct samples merged into this span (detail view only)
    pub sample_count: Option<u32>,
}

impl PixelSpan {
    #[inline]
    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

impl fmt::Display for PixelSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) d: {} c: {}",
            self.start, self.end, self.depth, self.color
        )?;
        if let Some(count) = self.sample_count {
            write!(f, " s: {}", count)?;
        }
        Ok(())
    }
}

/// Payload of a [`LineResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineContent {
    /// The timeline could not be initialized for the requested window
    Empty,
    /// Spans in left-to-right order (may be empty)
    Spans(Vec<PixelSpan>),
}

/// Rasterized output for one line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineResult {
    pub line: LineIndex,
    /// Pixel height assigned to this line by the row height policy
    pub height: i32,
    pub content: LineContent,
}

impl LineResult {
    pub fn new(line: LineIndex, height: i32, spans: Vec<PixelSpan>) -> Self {
        Self {
            line,
            height,
            content: LineContent::Spans(spans),
        }
    }

    /// The sentinel published when a line has no data in the window
    pub fn empty(line: LineIndex, height: i32) -> Self {
        Self {
            line,
            height,
            content: LineContent::Empty,
        }
    }

    pub fn is_empty_sentinel(&self) -> bool {
        matches!(self.content, LineContent::Empty)
    }

    /// Spans of this line; the sentinel has none
    pub fn spans(&self) -> &[PixelSpan] {
        match &self.content {
            LineContent::Empty => &[],
            LineContent::Spans(spans) => spans,
        }
    }

    /// Check that spans are non-empty, sorted and non-overlapping
    pub fn is_well_formed(&self) -> bool {
        let spans = self.spans();
        spans.iter().all(|s| s.start < s.end)
            && spans.windows(2).all(|w| w[0].end <= w[1].start)
    }
}
