//! Ingest types
//!
//! Configuration and counters for the batch ingestor.

use serde::Deserialize;
use std::fmt;
use std::ops::{Add, AddAssign};

/// Records per bulk write unless configured otherwise
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Rows shown by the verification step unless configured otherwise
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// Configuration for an ingest run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Records per bulk write
    pub batch_size: usize,
    /// Rows sampled by verification
    pub sample_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl IngestConfig {
    /// Create a new ingest config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set batch size
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Set verification sample size
    #[must_use]
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size;
        self
    }
}

/// Counters from an ingest run
///
/// Every record offered to the ingestor lands in exactly one counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Records written
    pub inserted: usize,
    /// Records already present in the store
    pub skipped: usize,
    /// Records the store rejected or never received
    pub errored: usize,
}

impl IngestStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record written records
    pub fn add_inserted(&mut self, count: usize) {
        self.inserted += count;
    }

    /// Record a duplicate
    pub fn add_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Record a failure
    pub fn add_error(&mut self) {
        self.errored += 1;
    }

    /// Records accounted for
    pub fn total(&self) -> usize {
        self.inserted + self.skipped + self.errored
    }
}

impl Add for IngestStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            inserted: self.inserted + other.inserted,
            skipped: self.skipped + other.skipped,
            errored: self.errored + other.errored,
        }
    }
}

impl AddAssign for IngestStats {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl fmt::Display for IngestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inserted, {} skipped, {} errors",
            self.inserted, self.skipped, self.errored
        )
    }
}
