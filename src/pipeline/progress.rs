//! Progress reporting and cooperative cancellation
//!
//! Workers report one unit per finished line and poll for cancellation at
//! every line boundary. [`ProgressTracker`] is the stock implementation:
//! an atomic counter plus a cancel flag that any thread may set.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Receives progress from workers and tells them when to stop
pub trait ProgressSink: Sync {
    /// One line has been processed (published or empty)
    fn report_one_unit_done(&self);

    /// Whether the run should stop at the next line boundary
    fn is_canceled(&self) -> bool;
}

impl<P: ProgressSink + Send + ?Sized> ProgressSink for Arc<P> {
    fn report_one_unit_done(&self) {
        (**self).report_one_unit_done()
    }

    fn is_canceled(&self) -> bool {
        (**self).is_canceled()
    }
}

impl<P: ProgressSink + ?Sized> ProgressSink for &P {
    fn report_one_unit_done(&self) {
        (**self).report_one_unit_done()
    }

    fn is_canceled(&self) -> bool {
        (**self).is_canceled()
    }
}

/// Ignores progress and never cancels
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report_one_unit_done(&self) {}

    fn is_canceled(&self) -> bool {
        false
    }
}

/// Thread-safe progress counter with a cancel flag
#[derive(Debug, Default)]
pub struct ProgressTracker {
    done: AtomicU64,
    total: u64,
    canceled: AtomicBool,
}

impl ProgressTracker {
    pub fn new(total: u64) -> Self {
        Self {
            done: AtomicU64::new(0),
            total,
            canceled: AtomicBool::new(false),
        }
    }

    /// Request cancellation; workers stop after their current line
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    pub fn completed(&self) -> u64 {
        self.done.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Completed fraction in `[0, 1]`; an empty run counts as complete
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.completed() as f64 / self.total as f64).min(1.0)
        }
    }
}

impl ProgressSink for ProgressTracker {
    fn report_one_unit_done(&self) {
        self.done.fetch_add(1, Ordering::SeqCst);
    }

    fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }
}
