//! Loader types and traits

use crate::error::{Error, Result};
use crate::normalize::RawRecord;
use std::path::Path;

/// Places checked, in order, when no input file is given
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "movies.csv",
    "movies.json",
    "../movies.csv",
    "../movies.json",
    "data/movies.csv",
    "data/movies.json",
    "exports/movies.csv",
    "exports/movies.json",
];

/// Format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated values with a header row
    Csv,
    /// JSON array of objects, or a single object
    Json,
}

impl InputFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }
}

/// Turns a file body into raw records
pub trait RecordDecoder: Send + Sync {
    /// Decode the whole body
    fn decode(&self, body: &str) -> Result<Vec<RawRecord>>;
}
