//! Store types

use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default table holding the movie rows
pub const DEFAULT_TABLE: &str = "movies";

/// Primary key of a stored row, as the store reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub JsonValue);

impl RowId {
    /// PostgREST equality filter for this id (`eq.42`)
    pub fn eq_filter(&self) -> String {
        format!("eq.{self}")
    }
}

impl From<i64> for RowId {
    fn from(id: i64) -> Self {
        Self(JsonValue::from(id))
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self(JsonValue::from(id))
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            JsonValue::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// Result of a write that reached the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Row(s) written: `201` for inserts, any 2xx for updates
    Created,
    /// Unique constraint violation
    Conflict,
    /// Any other rejection
    Failed {
        /// HTTP status returned by the store
        status: u16,
        /// Response body, for the log
        body: String,
    },
}

impl WriteOutcome {
    /// Whether the write went through
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created)
    }

    /// Classify a request error
    ///
    /// Status errors become outcomes. Transport failures stay errors.
    pub fn from_error(err: Error) -> Result<Self> {
        match err {
            Error::HttpStatus { status: 409, .. } => Ok(Self::Conflict),
            Error::HttpStatus { status, body } => Ok(Self::Failed { status, body }),
            Error::RateLimited {
                retry_after_seconds,
            } => Ok(Self::Failed {
                status: 429,
                body: format!("rate limited, retry after {retry_after_seconds}s"),
            }),
            other => Err(other),
        }
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Conflict => f.write_str("conflict"),
            Self::Failed { status, body } => write!(f, "failed ({status}): {body}"),
        }
    }
}

/// A stored row as read back for enrichment
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredMovie {
    pub id: RowId,
    #[serde(default)]
    pub tmdb_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Connection settings for [`super::RestStore`]
#[derive(Clone)]
pub struct StoreConfig {
    /// Project URL; `/rest/v1` is appended
    pub url: String,
    /// Service-role key
    pub service_key: String,
    /// Target table
    pub table: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries for transient failures
    pub max_retries: u32,
}

impl StoreConfig {
    /// Config with the default table, timeout and no retries
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_key: service_key.into(),
            table: DEFAULT_TABLE.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 0,
        }
    }

    /// Set the table
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry count
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("table", &self.table)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}
