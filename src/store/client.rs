//! PostgREST implementation of [`RecordStore`]

use super::types::{RowId, StoreConfig, StoredMovie, WriteOutcome};
use super::RecordStore;
use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::normalize::CanonicalRecord;
use crate::types::JsonValue;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::BTreeSet;
use tracing::debug;
use url::Url;

const PREFER_MINIMAL: &str = "return=minimal";

/// Store client speaking the PostgREST dialect
#[derive(Debug)]
pub struct RestStore {
    client: HttpClient,
    table: String,
}

impl RestStore {
    /// Connect to `{url}/rest/v1/{table}` with a service-role key
    pub fn new(config: StoreConfig) -> Result<Self> {
        if config.service_key.trim().is_empty() {
            return Err(Error::missing_setting("store.service_key"));
        }
        if config.table.trim().is_empty() {
            return Err(Error::invalid_setting("store.table", "must not be empty"));
        }

        let base = Url::parse(config.url.trim_end_matches('/'))?;
        let rest_base = format!("{}/rest/v1", base.as_str().trim_end_matches('/'));

        let http_config = HttpClientConfig::new(rest_base)
            .with_timeout(config.timeout)
            .with_max_retries(config.max_retries)
            .with_header("Content-Type", "application/json");
        let client = HttpClient::new(http_config, AuthConfig::service_role(config.service_key))?;

        Ok(Self {
            client,
            table: config.table,
        })
    }

    /// Table the store writes to
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Insert; only `201 Created` counts as written
    async fn write(&self, request: RequestConfig) -> Result<WriteOutcome> {
        match self.client.post(&self.table, request).await {
            Ok(response) if response.status() == StatusCode::CREATED => Ok(WriteOutcome::Created),
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                Ok(WriteOutcome::Failed { status, body })
            }
            Err(e) => WriteOutcome::from_error(e),
        }
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn insert_many(&self, records: &[CanonicalRecord]) -> Result<WriteOutcome> {
        let columns: BTreeSet<String> = records
            .iter()
            .flat_map(CanonicalRecord::column_names)
            .collect();
        let columns = columns.into_iter().collect::<Vec<_>>().join(",");
        let body = serde_json::to_value(records)?;

        debug!(table = %self.table, rows = records.len(), "bulk insert");
        let request = RequestConfig::new()
            .header("Prefer", PREFER_MINIMAL)
            .query("columns", columns)
            .json(body);
        self.write(request).await
    }

    async fn insert_one(&self, record: &CanonicalRecord) -> Result<WriteOutcome> {
        let body = serde_json::to_value(record)?;

        debug!(table = %self.table, title = %record.title, "single insert");
        let request = RequestConfig::new()
            .header("Prefer", PREFER_MINIMAL)
            .json(body);
        self.write(request).await
    }

    async fn find_by_tmdb_id(&self, tmdb_id: i64) -> Result<Option<RowId>> {
        let request = RequestConfig::new()
            .query("select", "id")
            .query("tmdb_id", format!("eq.{tmdb_id}"))
            .query("limit", "1");
        let rows: Vec<JsonValue> = self.client.get_json(&self.table, request).await?;

        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.get("id").cloned())
            .map(RowId))
    }

    async fn select(&self, columns: &[&str], limit: Option<usize>) -> Result<Vec<JsonValue>> {
        let mut request = RequestConfig::new().query("select", columns.join(","));
        if let Some(limit) = limit {
            request = request.query("limit", limit.to_string());
        }
        self.client.get_json(&self.table, request).await
    }

    async fn count(&self) -> Result<u64> {
        let request = RequestConfig::new()
            .query("select", "id")
            .header("Prefer", "count=exact");
        let response = self.client.get(&self.table, request).await?;

        let exact = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total);
        if let Some(total) = exact {
            return Ok(total);
        }

        debug!("no exact count in Content-Range, counting returned ids");
        let ids: Vec<JsonValue> = response.json().await?;
        Ok(ids.len() as u64)
    }

    async fn select_unenriched(&self, limit: usize) -> Result<Vec<StoredMovie>> {
        let request = RequestConfig::new()
            .query("select", "id,tmdb_id,title")
            .query("overview", "is.null")
            .query("limit", limit.to_string());
        self.client.get_json(&self.table, request).await
    }

    async fn update(&self, id: &RowId, record: &CanonicalRecord) -> Result<WriteOutcome> {
        let body = serde_json::to_value(record)?;
        let request = RequestConfig::new()
            .header("Prefer", PREFER_MINIMAL)
            .query("id", id.eq_filter())
            .json(body);

        // PATCH with `return=minimal` answers 204
        match self.client.patch(&self.table, request).await {
            Ok(_) => Ok(WriteOutcome::Created),
            Err(e) => WriteOutcome::from_error(e),
        }
    }
}

/// Total from a `Content-Range` header (`0-24/3573`, `*/0`)
///
/// An unknown total (`0-24/*`) yields `None`.
pub(crate) fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}
