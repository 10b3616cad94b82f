//! Configuration module for TraceVis-RS
//!
//! This module handles render configuration:
//! - [`RenderConfig`] - persisted defaults for a render run (worker count,
//!   queue capacity, sampling mode, separator threshold)
//! - [`ViewportAttributes`] - the immutable attributes of one render run,
//!   shared read-only by every worker
//!
//! # Config Location
//!
//! The default render config lives in the platform config directory under
//! `dev.tracevis-rs/render.toml`:
//!
//! - **Linux**: `~/.config/dev.tracevis-rs/`
//! - **macOS**: `~/Library/Application Support/dev.tracevis-rs/`
//! - **Windows**: `%APPDATA%\dev.tracevis-rs\`
//!
//! Files ending in `.toml` are read as TOML, anything else as JSON.
//!
//! # Example
//!
//! ```ignore
//! use tracevis_rs::config::{RenderConfig, ViewportAttributes};
//! use tracevis_rs::types::TimeWindow;
//!
//! let config = RenderConfig::load_or_default("render.toml");
//! let viewport = ViewportAttributes::from_config(&config, TimeWindow::new(0, 1_000_000), 1920, 4.0);
//! ```

pub mod viewport;

pub use viewport::*;

use crate::error::{Result, TraceVisError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "dev.tracevis-rs";

/// Render config filename
pub const RENDER_CONFIG_FILE: &str = "render.toml";

/// The minimum row height (in scaled pixels) at which white separator lines are painted
pub const MIN_HEIGHT_FOR_SEPARATOR_LINES: f64 = 15.0;

/// Default capacity of the bounded output queue used by streaming runs
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Invalid-sample ratio above which a run logs a warning
pub const DEFAULT_INVALID_WARNING_RATIO: f64 = 0.05;

// ==================== Config Directory ====================

/// Get the application config directory path
pub fn app_config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the application data directory path (used for log files)
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        TraceVisError::Config("Could not determine app data directory".to_string())
    })?;
    ensure_dir(dir)
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf> {
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

/// Get the path to the default render config file
pub fn render_config_path() -> Option<PathBuf> {
    app_config_dir().map(|p| p.join(RENDER_CONFIG_FILE))
}

// ==================== Render Config ====================

/// Persistent defaults for a render run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Number of worker threads (0 = available parallelism)
    pub workers: usize,

    /// Capacity of the output queue for streaming runs
    pub queue_capacity: usize,

    /// Probe each pixel column at its temporal midpoint instead of its start
    pub use_midpoint: bool,

    /// Call-path depth used for classification
    pub depth: u32,

    /// Scale above which rows lose one pixel to a separator line
    pub separator_threshold: f64,

    /// Invalid-sample ratio above which a run logs a warning
    pub invalid_warning_ratio: f64,

    /// Record per-span sample counts (detail view) instead of depth-only spans
    pub detail_sample_counts: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            use_midpoint: true,
            depth: 0,
            separator_threshold: MIN_HEIGHT_FOR_SEPARATOR_LINES,
            invalid_warning_ratio: DEFAULT_INVALID_WARNING_RATIO,
            detail_sample_counts: true,
        }
    }
}

impl RenderConfig {
    /// Load a render config from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TraceVisError::Config(format!("Failed to read render config {:?}: {}", path, e))
        })?;

        let config: RenderConfig = if is_toml(path) {
            toml::from_str(&content).map_err(|e| {
                TraceVisError::Config(format!("Failed to parse render config {:?}: {}", path, e))
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| {
                TraceVisError::Config(format!("Failed to parse render config {:?}: {}", path, e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load a render config, returning defaults if any error occurs
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("Using default render config: {}", e);
                Self::default()
            }
        }
    }

    /// Save the render config to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TraceVisError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = if is_toml(path) {
            toml::to_string_pretty(self)
                .map_err(|e| TraceVisError::Serialization(e.to_string()))?
        } else {
            serde_json::to_string_pretty(self)
                .map_err(|e| TraceVisError::Serialization(e.to_string()))?
        };

        std::fs::write(path, content).map_err(|e| {
            TraceVisError::Config(format!("Failed to write render config {:?}: {}", path, e))
        })
    }

    /// Reject values that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(TraceVisError::Config(
                "queue_capacity must be at least 1".to_string(),
            ));
        }
        if !self.separator_threshold.is_finite() {
            return Err(TraceVisError::Config(
                "separator_threshold must be finite".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.invalid_warning_ratio) {
            return Err(TraceVisError::Config(format!(
                "invalid_warning_ratio must be within [0, 1], got {}",
                self.invalid_warning_ratio
            )));
        }
        Ok(())
    }

    /// Resolve the worker count for a run over `line_count` lines
    ///
    /// Never spawns more workers than lines, and never fewer than one.
    pub fn effective_workers(&self, line_count: usize) -> usize {
        let requested = if self.workers == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            self.workers
        };
        requested.min(line_count).max(1)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}
