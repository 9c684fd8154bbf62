//! Input file loader
//!
//! Supports: CSV, JSON
//!
//! # Overview
//!
//! Reads a movie export into raw records for the normalizer. CSV cells are
//! typed (integer, float, text); empty cells and the `null` / `NaN` / `N/A`
//! markers become `RawValue::Null`.

mod decoders;
mod types;

pub use decoders::{CsvDecoder, JsonDecoder};
pub use types::{InputFormat, RecordDecoder, DEFAULT_CANDIDATES};

use crate::error::{Error, Result};
use crate::normalize::RawRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Decoder for a format
pub fn decoder_for(format: InputFormat) -> Box<dyn RecordDecoder> {
    match format {
        InputFormat::Csv => Box::new(CsvDecoder::new()),
        InputFormat::Json => Box::new(JsonDecoder::new()),
    }
}

/// Load every record from a `.csv` or `.json` file
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let format = InputFormat::from_path(path)?;
    if !path.is_file() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let body = fs::read_to_string(path)?;
    let records = decoder_for(format).decode(&body)?;
    info!(path = %path.display(), ?format, records = records.len(), "loaded input file");
    Ok(records)
}

/// First default candidate that exists under `dir`
pub fn discover_input(dir: impl AsRef<Path>) -> Option<PathBuf> {
    let dir = dir.as_ref();
    DEFAULT_CANDIDATES
        .iter()
        .map(|candidate| dir.join(candidate))
        .inspect(|path| debug!(path = %path.display(), "checking for input"))
        .find(|path| path.is_file())
}
