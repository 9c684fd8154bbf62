//! Import pipeline
//!
//! Normalize, ingest, verify, in that order.

use crate::error::{Error, Result};
use crate::ingest::{BatchIngestor, IngestConfig, IngestStats};
use crate::normalize::{Normalizer, RawRecord};
use crate::store::RecordStore;
use crate::verify::verify;
use std::fmt;
use tracing::{info, warn};

/// Row count as seen by the verification step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCount {
    /// The store answered with this many rows
    Known(u64),
    /// The count could not be obtained
    Unavailable(String),
}

impl fmt::Display for StoreCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(total) => write!(f, "{total}"),
            Self::Unavailable(reason) => write!(f, "unavailable ({reason})"),
        }
    }
}

/// Outcome of one import run
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    /// Raw records read from the source
    pub loaded: usize,
    /// Raw records dropped for lacking a title
    pub rejected: usize,
    /// Write counters
    pub stats: IngestStats,
    /// Rows in the store after the run
    pub store_count: StoreCount,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Import summary")?;
        writeln!(f, "  loaded:         {}", self.loaded)?;
        writeln!(f, "  rejected:       {}", self.rejected)?;
        writeln!(f, "  inserted:       {}", self.stats.inserted)?;
        writeln!(f, "  skipped:        {}", self.stats.skipped)?;
        writeln!(f, "  errors:         {}", self.stats.errored)?;
        write!(f, "  total in store: {}", self.store_count)
    }
}

/// Run a full import of `raws` into `store`
///
/// Fails only when no record survives normalization; store trouble shows up
/// in the counters and in [`StoreCount::Unavailable`].
pub async fn run_import(
    store: &dyn RecordStore,
    normalizer: &Normalizer,
    raws: &[RawRecord],
    config: &IngestConfig,
) -> Result<ImportSummary> {
    let outcome = normalizer.normalize_all(raws);
    info!(
        loaded = raws.len(),
        valid = outcome.records.len(),
        rejected = outcome.rejected,
        "normalized input"
    );

    if outcome.records.is_empty() {
        return Err(Error::NoValidRecords {
            rejected: outcome.rejected,
        });
    }

    let stats = BatchIngestor::new(store)
        .ingest(&outcome.records, config.batch_size)
        .await;

    let store_count = match verify(store, config.sample_size).await {
        Ok(report) => StoreCount::Known(report.total),
        Err(e) => {
            warn!(error = %e, "could not verify import");
            StoreCount::Unavailable(e.to_string())
        }
    };

    Ok(ImportSummary {
        loaded: raws.len(),
        rejected: outcome.rejected,
        stats,
        store_count,
    })
}
