//! In-memory store used by unit tests
//!
//! Enforces a unique `tmdb_id` the way the real table does, and can be told
//! to fail specific operations.

use super::{RecordStore, RowId, StoredMovie, WriteOutcome};
use crate::error::{Error, Result};
use crate::normalize::CanonicalRecord;
use crate::types::JsonValue;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    pub rows: Mutex<Vec<(i64, CanonicalRecord)>>,
    /// Every bulk write answers 500
    pub fail_bulk: bool,
    /// Single writes of these titles answer 500
    pub fail_titles: HashSet<String>,
    /// Single writes of these titles fail at the transport level
    pub unreachable_titles: HashSet<String>,
    /// Lookups by tmdb id fail at the transport level
    pub fail_lookup: bool,
    /// Sample reads fail
    pub fail_select: bool,
    /// Counting fails
    pub fail_count: bool,
    pub bulk_calls: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `records`
    pub fn with_rows(records: impl IntoIterator<Item = CanonicalRecord>) -> Self {
        let store = Self::new();
        {
            let mut rows = store.rows.lock().unwrap();
            for record in records {
                let id = rows.len() as i64 + 1;
                rows.push((id, record));
            }
        }
        store
    }

    pub fn rows(&self) -> Vec<CanonicalRecord> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn titles(&self) -> Vec<String> {
        self.rows().into_iter().map(|r| r.title).collect()
    }

    pub fn bulk_calls(&self) -> usize {
        *self.bulk_calls.lock().unwrap()
    }

    fn conflicts(rows: &[(i64, CanonicalRecord)], record: &CanonicalRecord) -> bool {
        record.tmdb_id.is_some()
            && rows
                .iter()
                .any(|(_, existing)| existing.tmdb_id == record.tmdb_id)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_many(&self, records: &[CanonicalRecord]) -> Result<WriteOutcome> {
        *self.bulk_calls.lock().unwrap() += 1;
        if self.fail_bulk {
            return Ok(WriteOutcome::Failed {
                status: 500,
                body: "bulk writes disabled".to_string(),
            });
        }

        let mut rows = self.rows.lock().unwrap();
        let mut staged: Vec<(i64, CanonicalRecord)> = Vec::new();
        for record in records {
            if Self::conflicts(&rows, record) || Self::conflicts(&staged, record) {
                return Ok(WriteOutcome::Conflict);
            }
            staged.push((rows.len() as i64 + staged.len() as i64 + 1, record.clone()));
        }
        rows.extend(staged);
        Ok(WriteOutcome::Created)
    }

    async fn insert_one(&self, record: &CanonicalRecord) -> Result<WriteOutcome> {
        if self.unreachable_titles.contains(&record.title) {
            return Err(Error::store("connection reset"));
        }
        if self.fail_titles.contains(&record.title) {
            return Ok(WriteOutcome::Failed {
                status: 500,
                body: "internal error".to_string(),
            });
        }

        let mut rows = self.rows.lock().unwrap();
        if Self::conflicts(&rows, record) {
            return Ok(WriteOutcome::Conflict);
        }
        let id = rows.len() as i64 + 1;
        rows.push((id, record.clone()));
        Ok(WriteOutcome::Created)
    }

    async fn find_by_tmdb_id(&self, tmdb_id: i64) -> Result<Option<RowId>> {
        if self.fail_lookup {
            return Err(Error::store("lookup unavailable"));
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|(_, r)| r.tmdb_id == Some(tmdb_id))
            .map(|(id, _)| RowId::from(*id)))
    }

    async fn select(&self, columns: &[&str], limit: Option<usize>) -> Result<Vec<JsonValue>> {
        if self.fail_select {
            return Err(Error::store("select unavailable"));
        }
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|(id, record)| {
                let full = serde_json::to_value(record).unwrap();
                let mut row = serde_json::Map::new();
                for column in columns {
                    let value = if *column == "id" {
                        JsonValue::from(*id)
                    } else {
                        full.get(*column).cloned().unwrap_or(JsonValue::Null)
                    };
                    row.insert((*column).to_string(), value);
                }
                JsonValue::Object(row)
            })
            .collect())
    }

    async fn count(&self) -> Result<u64> {
        if self.fail_count {
            return Err(Error::store("count unavailable"));
        }
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn select_unenriched(&self, limit: usize) -> Result<Vec<StoredMovie>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, r)| r.overview.is_none())
            .take(limit)
            .map(|(id, r)| StoredMovie {
                id: RowId::from(*id),
                tmdb_id: r.tmdb_id,
                title: Some(r.title.clone()),
            })
            .collect())
    }

    async fn update(&self, id: &RowId, record: &CanonicalRecord) -> Result<WriteOutcome> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|(row_id, _)| RowId::from(*row_id) == *id) {
            Some((_, existing)) => {
                existing.merge_from(record.clone());
                Ok(WriteOutcome::Created)
            }
            None => Ok(WriteOutcome::Failed {
                status: 404,
                body: format!("no row {id}"),
            }),
        }
    }
}
