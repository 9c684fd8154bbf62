//! Decoder implementations

use super::types::RecordDecoder;
use crate::error::{Error, Result};
use crate::normalize::{raw_from_json, RawRecord, RawValue};
use crate::types::JsonValue;
use tracing::warn;

// ============================================================================
// CSV Decoder
// ============================================================================

/// CSV decoder; the first row names the fields
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvDecoder;

impl CsvDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for CsvDecoder {
    fn decode(&self, body: &str) -> Result<Vec<RawRecord>> {
        let body = body.trim_start_matches('\u{feff}');
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(body.as_bytes());

        let headers = reader.headers()?.clone();
        let mut records = Vec::new();

        for row in reader.records() {
            let row = row?;
            let record: RawRecord = headers
                .iter()
                .zip(row.iter())
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, cell)| (header.to_string(), parse_cell(cell)))
                .collect();
            if !record.is_empty() {
                records.push(record);
            }
        }

        Ok(records)
    }
}

/// Type a CSV cell
///
/// Integers and floats are recognised only in their plain spelling, so a
/// title such as `Infinity` or `007` stays text.
pub(crate) fn parse_cell(cell: &str) -> RawValue {
    if cell.is_empty() || is_null_marker(cell) {
        return RawValue::Null;
    }

    if let Ok(i) = cell.parse::<i64>() {
        if i.to_string() == cell {
            return RawValue::Int(i);
        }
    }

    let numeric_chars = cell
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    let has_digit = cell.chars().any(|c| c.is_ascii_digit());
    let leading_zero = cell.len() > 1 && cell.starts_with('0') && !cell.starts_with("0.");
    if numeric_chars && has_digit && !leading_zero {
        if let Ok(f) = cell.parse::<f64>() {
            return RawValue::Float(f);
        }
    }

    RawValue::text(cell)
}

fn is_null_marker(cell: &str) -> bool {
    ["null", "nan", "n/a"]
        .iter()
        .any(|marker| cell.eq_ignore_ascii_case(marker))
}

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder accepting an array of objects or a single object
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder;

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<RawRecord>> {
        let value: JsonValue = serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })?;

        match value {
            JsonValue::Array(items) => Ok(items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    let record = raw_from_json(item);
                    if record.is_none() {
                        warn!(index, "skipping JSON element that is not an object");
                    }
                    record
                })
                .collect()),
            JsonValue::Object(_) => Ok(raw_from_json(&value).into_iter().collect()),
            _ => Err(Error::decode(
                "expected a JSON array of objects or a single object",
            )),
        }
    }
}
