//! Render attributes for a single pipeline run
//!
//! [`ViewportAttributes`] fixes the time window, horizontal resolution and
//! vertical scale of one run. Every worker reads the same instance; nothing
//! mutates it once the run starts.

use super::{RenderConfig, MIN_HEIGHT_FOR_SEPARATOR_LINES};
use crate::types::{TimeWindow, Timestamp};
use serde::{Deserialize, Serialize};

/// Immutable attributes of one render run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportAttributes {
    /// Time range being rendered
    pub window: TimeWindow,
    /// Number of horizontal pixel columns
    pub pixels_h: u32,
    /// Vertical pixels per line
    pub scale_y: f64,
    /// Call-path depth used for classification
    pub depth: u32,
    /// Probe each column at its temporal midpoint
    pub use_midpoint: bool,
    /// Scale above which rows lose one pixel to a separator line
    pub separator_threshold: f64,
}

impl ViewportAttributes {
    pub fn new(window: TimeWindow, pixels_h: u32, scale_y: f64) -> Self {
        Self {
            window,
            pixels_h,
            scale_y,
            depth: 0,
            use_midpoint: true,
            separator_threshold: MIN_HEIGHT_FOR_SEPARATOR_LINES,
        }
    }

    /// Build attributes using the sampling settings of a [`RenderConfig`]
    pub fn from_config(
        config: &RenderConfig,
        window: TimeWindow,
        pixels_h: u32,
        scale_y: f64,
    ) -> Self {
        Self {
            window,
            pixels_h,
            scale_y,
            depth: config.depth,
            use_midpoint: config.use_midpoint,
            separator_threshold: config.separator_threshold,
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_midpoint(mut self, use_midpoint: bool) -> Self {
        self.use_midpoint = use_midpoint;
        self
    }

    /// Trace time covered by one pixel column
    pub fn pixel_length(&self) -> f64 {
        self.window.interval as f64 / self.pixels_h as f64
    }

    /// Time at which column `column` is probed
    ///
    /// Column start, or column midpoint when `use_midpoint` is set.
    pub fn probe_time(&self, column: u32) -> Timestamp {
        let pixel_length = self.pixel_length();
        let offset = if self.use_midpoint {
            (column as f64 + 0.5) * pixel_length
        } else {
            column as f64 * pixel_length
        };
        self.window.begin + offset as Timestamp
    }

    /// Check the attributes describe a drawable viewport
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.window.is_empty() {
            return Err(format!(
                "time window [{}, {}) is empty",
                self.window.begin,
                self.window.end()
            ));
        }
        if self.pixels_h == 0 {
            return Err("viewport has no horizontal pixels".to_string());
        }
        if !self.scale_y.is_finite() || self.scale_y <= 0.0 {
            return Err(format!("vertical scale {} is not positive", self.scale_y));
        }
        Ok(())
    }
}
