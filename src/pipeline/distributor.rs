//! Lock-free hand-out of line indices to workers.

use crate::types::LineIndex;
use std::sync::atomic::{AtomicU32, Ordering};

/// Issues every line index in `[0, total)` exactly once across all callers
#[derive(Debug)]
pub struct WorkDistributor {
    next: AtomicU32,
    total: u32,
}

impl WorkDistributor {
    pub fn new(total: u32) -> Self {
        Self {
            next: AtomicU32::new(0),
            total,
        }
    }

    /// Claim the next unprocessed line, or `None` once all lines are taken
    ///
    /// Never blocks. The counter stops at `total`, so repeated calls after
    /// exhaustion cannot wrap around and re-issue an index.
    pub fn claim_next(&self) -> Option<LineIndex> {
        let total = self.total;
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                (n < total).then(|| n + 1)
            })
            .ok()
            .map(LineIndex)
    }

    /// Number of lines handed out so far
    pub fn claimed(&self) -> u32 {
        self.next.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_exhausted(&self) -> bool {
        self.claimed() >= self.total
    }
}
