//! Span sinks
//!
//! The rasterizer reports every finished run of columns to a [`SpanSink`].
//! The sink decides what to keep: [`DetailSink`] records sample counts for
//! the main timeline view, [`DepthSink`] drops them for the depth view.

use crate::types::{Color, PixelSpan};

/// Receives span-boundary events from the rasterizer, left to right
pub trait SpanSink {
    /// A run of columns `[start, end)` with one color has finished
    fn finish_line(&mut self, start: u32, end: u32, depth: u32, color: Color, sample_count: u32);

    /// Consume the sink, yielding the collected spans
    fn into_spans(self) -> Vec<PixelSpan>;
}

/// Collects spans with per-span sample counts
#[derive(Debug, Default)]
pub struct DetailSink {
    spans: Vec<PixelSpan>,
}

impl DetailSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            spans: Vec::with_capacity(capacity),
        }
    }
}

impl SpanSink for DetailSink {
    fn finish_line(&mut self, start: u32, end: u32, depth: u32, color: Color, sample_count: u32) {
        self.spans.push(PixelSpan {
            start,
            end,
            depth,
            color,
            sample_count: Some(sample_count),
        });
    }

    fn into_spans(self) -> Vec<PixelSpan> {
        self.spans
    }
}

/// Collects spans without sample counts
#[derive(Debug, Default)]
pub struct DepthSink {
    spans: Vec<PixelSpan>,
}

impl DepthSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpanSink for DepthSink {
    fn finish_line(&mut self, start: u32, end: u32, depth: u32, color: Color, _sample_count: u32) {
        self.spans.push(PixelSpan {
            start,
            end,
            depth,
            color,
            sample_count: None,
        });
    }

    fn into_spans(self) -> Vec<PixelSpan> {
        self.spans
    }
}

/// Runtime choice between the two views, for callers driven by config
#[derive(Debug)]
pub enum ViewSink {
    Detail(DetailSink),
    Depth(DepthSink),
}

impl ViewSink {
    pub fn new(detail: bool) -> Self {
        if detail {
            ViewSink::Detail(DetailSink::new())
        } else {
            ViewSink::Depth(DepthSink::new())
        }
    }
}

impl SpanSink for ViewSink {
    fn finish_line(&mut self, start: u32, end: u32, depth: u32, color: Color, sample_count: u32) {
        match self {
            ViewSink::Detail(sink) => sink.finish_line(start, end, depth, color, sample_count),
            ViewSink::Depth(sink) => sink.finish_line(start, end, depth, color, sample_count),
        }
    }

    fn into_spans(self) -> Vec<PixelSpan> {
        match self {
            ViewSink::Detail(sink) => sink.into_spans(),
            ViewSink::Depth(sink) => sink.into_spans(),
        }
    }
}
