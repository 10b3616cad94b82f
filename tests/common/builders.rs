//! Test data builders for traces and viewports

use super::test_color;
use tracevis_rs::color::Classification;
use tracevis_rs::timeline::MemoryTraceDatabase;
use tracevis_rs::types::{CallPathId, Sample, TimeWindow, Timestamp};
use tracevis_rs::ViewportAttributes;

/// Classifier used across integration tests: call path 0 is unknown,
/// every other id resolves at depth `id`.
pub fn test_classifier(call_path: CallPathId, _depth: u32) -> Option<Classification> {
    (call_path != 0).then(|| Classification::new(call_path, test_color(call_path)))
}

/// Builder for in-memory traces with evenly spaced samples
pub struct TraceBuilder {
    lines: usize,
    samples_per_line: usize,
    interval: Timestamp,
    call_paths: u32,
    empty_lines: Vec<usize>,
}

impl TraceBuilder {
    pub fn new(lines: usize) -> Self {
        Self {
            lines,
            samples_per_line: 200,
            interval: 10,
            call_paths: 4,
            empty_lines: Vec::new(),
        }
    }

    pub fn samples_per_line(mut self, samples: usize) -> Self {
        self.samples_per_line = samples;
        self
    }

    pub fn interval(mut self, interval: Timestamp) -> Self {
        self.interval = interval;
        self
    }

    /// Lines that get no samples at all
    pub fn empty_line(mut self, line: usize) -> Self {
        self.empty_lines.push(line);
        self
    }

    /// Time covered by every non-empty line
    pub fn duration(&self) -> Timestamp {
        self.samples_per_line as Timestamp * self.interval
    }

    pub fn build(self) -> MemoryTraceDatabase {
        let mut db = MemoryTraceDatabase::new();
        for line in 0..self.lines {
            if self.empty_lines.contains(&line) {
                db.push_line(Vec::new());
                continue;
            }
            // Call paths change every few samples, never 0
            let samples = (0..self.samples_per_line)
                .map(|i| {
                    let call_path = ((i / 7 + line) as u32 % self.call_paths) + 1;
                    Sample::new(i as Timestamp * self.interval, call_path)
                })
                .collect();
            db.push_line(samples);
        }
        db
    }
}

/// Builder for viewport attributes
pub struct ViewportBuilder {
    window: TimeWindow,
    pixels: u32,
    scale_y: f64,
    use_midpoint: bool,
}

impl ViewportBuilder {
    pub fn new(begin: Timestamp, interval: Timestamp) -> Self {
        Self {
            window: TimeWindow::new(begin, interval),
            pixels: 100,
            scale_y: 4.0,
            use_midpoint: true,
        }
    }

    pub fn pixels(mut self, pixels: u32) -> Self {
        self.pixels = pixels;
        self
    }

    pub fn scale_y(mut self, scale_y: f64) -> Self {
        self.scale_y = scale_y;
        self
    }

    pub fn midpoint(mut self, use_midpoint: bool) -> Self {
        self.use_midpoint = use_midpoint;
        self
    }

    pub fn build(self) -> ViewportAttributes {
        ViewportAttributes::new(self.window, self.pixels, self.scale_y)
            .with_midpoint(self.use_midpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracevis_rs::TimelineProvider;

    #[test]
    fn test_trace_builder() {
        let builder = TraceBuilder::new(3).samples_per_line(50).empty_line(1);
        assert_eq!(builder.duration(), 500);

        let db = builder.build();
        assert_eq!(db.line_count(), 3);
        assert_eq!(db.total_samples(), 100);
    }

    #[test]
    fn test_viewport_builder() {
        let vp = ViewportBuilder::new(100, 1000).pixels(50).midpoint(false).build();
        assert_eq!(vp.window.begin, 100);
        assert_eq!(vp.pixels_h, 50);
        assert!(!vp.use_midpoint);
        assert_eq!(vp.probe_time(1), 120);
    }
}
