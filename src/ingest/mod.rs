//! Batch ingestion module
//!
//! Writes canonical records to a [`RecordStore`] with a two-tier strategy.
//!
//! # Overview
//!
//! - Records are cut into consecutive batches and each batch goes out as
//!   one bulk write
//! - A batch that conflicts, is rejected, or never reaches the store is
//!   retried record by record ([`BatchIngestor::insert_each`])
//! - Per-record writes check for an existing `tmdb_id` first; duplicates
//!   are skipped rather than written
//!
//! Nothing here aborts a run: every record ends up inserted, skipped or
//! errored, and the counts come back as [`IngestStats`].

mod types;

pub use types::{IngestConfig, IngestStats, DEFAULT_BATCH_SIZE, DEFAULT_SAMPLE_SIZE};

use crate::normalize::CanonicalRecord;
use crate::store::{RecordStore, WriteOutcome};
use tracing::{debug, error, info, warn};

/// Drives bulk writes with per-record fallback
pub struct BatchIngestor<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> BatchIngestor<'a> {
    /// Create an ingestor writing to `store`
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Write `records` in batches of `batch_size`
    ///
    /// A `batch_size` of zero is treated as one.
    pub async fn ingest(&self, records: &[CanonicalRecord], batch_size: usize) -> IngestStats {
        let batch_size = batch_size.max(1);
        let total_batches = records.len().div_ceil(batch_size);
        let mut stats = IngestStats::new();

        for (index, batch) in records.chunks(batch_size).enumerate() {
            let batch_num = index + 1;
            info!(
                batch = batch_num,
                of = total_batches,
                size = batch.len(),
                "processing batch"
            );

            match self.store.insert_many(batch).await {
                Ok(WriteOutcome::Created) => {
                    debug!(batch = batch_num, "batch inserted");
                    stats.add_inserted(batch.len());
                }
                Ok(WriteOutcome::Conflict) => {
                    warn!(batch = batch_num, "batch has duplicates, inserting individually");
                    stats += self.insert_each(batch).await;
                }
                Ok(WriteOutcome::Failed { status, body }) => {
                    warn!(batch = batch_num, status, %body, "batch rejected, inserting individually");
                    stats += self.insert_each(batch).await;
                }
                Err(e) => {
                    warn!(batch = batch_num, error = %e, "batch write failed, inserting individually");
                    stats += self.insert_each(batch).await;
                }
            }
        }

        info!(%stats, "ingest finished");
        stats
    }

    /// Write `records` one at a time, skipping known `tmdb_id`s
    pub async fn insert_each(&self, records: &[CanonicalRecord]) -> IngestStats {
        let mut stats = IngestStats::new();

        for record in records {
            if let Some(tmdb_id) = record.tmdb_id {
                match self.store.find_by_tmdb_id(tmdb_id).await {
                    Ok(Some(_)) => {
                        debug!(tmdb_id, title = %record.title, "already stored, skipping");
                        stats.add_skipped();
                        continue;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        // The unique constraint on tmdb_id still catches duplicates.
                        warn!(tmdb_id, error = %e, "existence check failed, inserting anyway");
                    }
                }
            }

            match self.store.insert_one(record).await {
                Ok(WriteOutcome::Created) => stats.add_inserted(1),
                Ok(WriteOutcome::Conflict) => {
                    debug!(title = %record.title, "duplicate on insert, skipping");
                    stats.add_skipped();
                }
                Ok(WriteOutcome::Failed { status, body }) => {
                    error!(title = %record.title, status, %body, "failed to insert movie");
                    stats.add_error();
                }
                Err(e) => {
                    error!(title = %record.title, error = %e, "failed to insert movie");
                    stats.add_error();
                }
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests;
