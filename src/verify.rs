//! Post-import verification
//!
//! Reads a few rows back and asks the store for its row count.

use crate::error::Result;
use crate::store::RecordStore;
use crate::types::JsonValue;
use tracing::{info, warn};

const SAMPLE_COLUMNS: [&str; 2] = ["tmdb_id", "title"];

/// What the store reported after an import
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationReport {
    /// Up to `sample_size` rows with `tmdb_id` and `title`
    pub sample: Vec<JsonValue>,
    /// Total rows in the store
    pub total: u64,
}

/// Sample and count the store
///
/// A failed sample read only empties the sample. A failed count is an error,
/// so an unreachable store is never reported as an empty one.
pub async fn verify(store: &dyn RecordStore, sample_size: usize) -> Result<VerificationReport> {
    let sample = match store.select(&SAMPLE_COLUMNS, Some(sample_size)).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!(error = %e, "could not read sample rows");
            Vec::new()
        }
    };

    for row in &sample {
        info!(
            tmdb_id = %row.get("tmdb_id").unwrap_or(&JsonValue::Null),
            title = %row.get("title").and_then(JsonValue::as_str).unwrap_or("?"),
            "sample row"
        );
    }

    let total = store.count().await?;
    info!(total, "movies in store");

    Ok(VerificationReport { sample, total })
}
