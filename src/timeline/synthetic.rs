//! Synthetic trace generation
//!
//! Builds deterministic in-memory traces for the demo binary, benchmarks and
//! tests, without any trace files on disk.
//!
//! # Patterns
//!
//! - [`SyntheticPattern::Steady`] - every sample of a line hits the same call path
//! - [`SyntheticPattern::Phased`] - lines cycle through call paths in fixed-length phases
//! - [`SyntheticPattern::Random`] - call paths drawn from a seeded xorshift generator
//!
//! # Example
//!
//! ```ignore
//! use tracevis_rs::timeline::synthetic::{SyntheticPattern, SyntheticTrace};
//!
//! let trace = SyntheticTrace::new(64, 10_000)
//!     .with_pattern(SyntheticPattern::Phased { period: 250 });
//! let (database, call_paths) = trace.build();
//! ```

use super::MemoryTraceDatabase;
use crate::color::{CallPathTable, ColorTable};
use crate::types::{CallPathId, Sample, Timestamp};

/// Procedure names used for generated call paths
const PROCEDURES: [&str; 8] = [
    "compute",
    "mpi_wait",
    "mpi_send",
    "io_write",
    "solve",
    "reduce",
    "pack",
    "barrier",
];

/// How call paths are assigned to samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticPattern {
    /// One call path per line
    Steady,
    /// Call path changes every `period` samples
    Phased { period: usize },
    /// Seeded pseudo-random call paths
    Random { seed: u64 },
}

impl Default for SyntheticPattern {
    fn default() -> Self {
        SyntheticPattern::Phased { period: 32 }
    }
}

/// Recipe for a generated trace
#[derive(Debug, Clone)]
pub struct SyntheticTrace {
    pub lines: usize,
    pub samples_per_line: usize,
    /// Time between consecutive samples
    pub sample_interval: Timestamp,
    /// Number of distinct call paths (at most the number of procedures)
    pub call_paths: u32,
    pub pattern: SyntheticPattern,
}

impl SyntheticTrace {
    pub fn new(lines: usize, samples_per_line: usize) -> Self {
        Self {
            lines,
            samples_per_line,
            sample_interval: 1_000,
            call_paths: PROCEDURES.len() as u32,
            pattern: SyntheticPattern::default(),
        }
    }

    pub fn with_pattern(mut self, pattern: SyntheticPattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_sample_interval(mut self, interval: Timestamp) -> Self {
        self.sample_interval = interval.max(1);
        self
    }

    /// Time span covered by every line
    pub fn duration(&self) -> Timestamp {
        self.samples_per_line as Timestamp * self.sample_interval
    }

    /// Generate the trace and the call-path table that resolves it
    pub fn build(&self) -> (MemoryTraceDatabase, CallPathTable) {
        let call_paths = self.call_paths.clamp(1, PROCEDURES.len() as u32);

        let mut database = MemoryTraceDatabase::new();
        for line in 0..self.lines {
            let mut rng = XorShift::new(match self.pattern {
                SyntheticPattern::Random { seed } => seed ^ (line as u64 + 1),
                _ => line as u64 + 1,
            });
            let samples = (0..self.samples_per_line)
                .map(|i| {
                    let call_path = match self.pattern {
                        SyntheticPattern::Steady => line as u32 % call_paths,
                        SyntheticPattern::Phased { period } => {
                            ((i / period.max(1)) as u32 + line as u32) % call_paths
                        }
                        SyntheticPattern::Random { .. } => (rng.next() % call_paths as u64) as u32,
                    };
                    Sample::new(i as Timestamp * self.sample_interval, call_path)
                })
                .collect();
            database.push_line(samples);
        }

        let mut table = CallPathTable::new(ColorTable::new());
        for id in 0..call_paths {
            table.insert(id as CallPathId, ["main", PROCEDURES[id as usize]]);
        }

        (database, table)
    }
}

/// Xorshift64; deterministic, no external dependency
struct XorShift(u64);

impl XorShift {
    fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    fn next(&mut self) -> u64 {
        let mut s = self.0;
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;
        self.0 = s;
        s
    }
}
