//! Remote store module
//!
//! The [`RecordStore`] trait is the seam between the ingestion logic and
//! the relational store. [`RestStore`] implements it against a
//! PostgREST endpoint.
//!
//! Writes report a [`WriteOutcome`] when the store answered, whatever the
//! answer; an `Err` means the store could not be reached at all.

mod client;
#[cfg(test)]
pub(crate) mod memory;
mod types;

pub use client::RestStore;
pub use types::{RowId, StoreConfig, StoredMovie, WriteOutcome, DEFAULT_TABLE};

use crate::error::Result;
use crate::normalize::CanonicalRecord;
use crate::types::JsonValue;
use async_trait::async_trait;

/// Operations the pipeline needs from the movie store
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Write a group of records in one request
    async fn insert_many(&self, records: &[CanonicalRecord]) -> Result<WriteOutcome>;

    /// Write a single record
    async fn insert_one(&self, record: &CanonicalRecord) -> Result<WriteOutcome>;

    /// Id of the row holding `tmdb_id`, if any
    async fn find_by_tmdb_id(&self, tmdb_id: i64) -> Result<Option<RowId>>;

    /// Read `columns` from up to `limit` rows
    async fn select(&self, columns: &[&str], limit: Option<usize>) -> Result<Vec<JsonValue>>;

    /// Total number of rows
    async fn count(&self) -> Result<u64>;

    /// Rows still lacking an overview
    async fn select_unenriched(&self, limit: usize) -> Result<Vec<StoredMovie>>;

    /// Overwrite the populated fields of one row
    async fn update(&self, id: &RowId, record: &CanonicalRecord) -> Result<WriteOutcome>;
}
