//! Per-field coercion
//!
//! Each function turns one raw value into an optional typed value. `None`
//! means "drop this field"; nothing here can fail the whole record.

use super::types::RawValue;

/// Largest float magnitude rendered as an integer by [`text`]
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// String form of a value
///
/// Integral floats print without a fractional part, so a numeric id read
/// as `603.0` by a spreadsheet reader stays `603`.
pub fn text(value: &RawValue) -> Option<String> {
    match value {
        RawValue::Null => None,
        RawValue::Bool(b) => Some(b.to_string()),
        RawValue::Int(i) => Some(i.to_string()),
        RawValue::Float(f) if f.is_nan() => None,
        RawValue::Float(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_FLOAT => {
            Some(format!("{}", *f as i64))
        }
        RawValue::Float(f) => Some(f.to_string()),
        RawValue::Text(s) => Some(s.clone()),
        RawValue::List(items) => {
            let parts: Vec<serde_json::Value> = items
                .iter()
                .filter_map(text)
                .map(serde_json::Value::String)
                .collect();
            Some(serde_json::Value::Array(parts).to_string())
        }
    }
}

/// Integer identifier; floats only when they have no fractional part
pub fn exact_int(value: &RawValue) -> Option<i64> {
    match value {
        RawValue::Int(i) => Some(*i),
        RawValue::Float(f) if f.is_finite() && f.fract() == 0.0 => float_to_i64(*f),
        RawValue::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Year from an integer or a date-like string (`"1999-12-31"` → 1999)
pub fn year(value: &RawValue) -> Option<i32> {
    match value {
        RawValue::Int(i) => i32::try_from(*i).ok(),
        RawValue::Float(f) if f.is_finite() => float_to_i64(f.trunc()).and_then(to_i32),
        RawValue::Text(s) => {
            let leading = match s.split_once('-') {
                Some((head, _)) => head,
                None => s.as_str(),
            };
            leading.trim().parse().ok()
        }
        _ => None,
    }
}

/// Parse as float, then truncate toward zero
pub fn truncated_int(value: &RawValue) -> Option<i32> {
    match value {
        RawValue::Int(i) => i32::try_from(*i).ok(),
        other => float(other).and_then(|f| float_to_i64(f.trunc())).and_then(to_i32),
    }
}

/// Finite float
pub fn float(value: &RawValue) -> Option<f64> {
    let parsed = match value {
        RawValue::Int(i) => *i as f64,
        RawValue::Float(f) => *f,
        RawValue::Text(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

/// Ordered list of strings
///
/// Sequences are taken element by element. Text is read as a JSON array
/// when it parses as one, otherwise split on commas. Any other scalar
/// becomes a one-element list.
pub fn string_list(value: &RawValue) -> Option<Vec<String>> {
    match value {
        RawValue::List(items) => Some(
            items
                .iter()
                .filter(|item| !item.is_missing())
                .filter_map(text)
                .collect(),
        ),
        RawValue::Text(s) => Some(match serde_json::from_str::<serde_json::Value>(s) {
            Ok(serde_json::Value::Array(items)) => items
                .iter()
                .map(RawValue::from)
                .filter(|item| !item.is_missing())
                .filter_map(|item| text(&item))
                .collect(),
            Ok(other) => text(&RawValue::from(&other)).into_iter().collect(),
            Err(_) => s
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
        }),
        other => text(other).map(|s| vec![s]),
    }
}

/// Absolute URL; root-relative paths get `base` prepended
pub fn image_url(value: &RawValue, base: &str) -> Option<String> {
    let value = text(value)?;
    if value.starts_with('/') {
        Some(format!("{}{value}", base.trim_end_matches('/')))
    } else {
        Some(value)
    }
}

fn float_to_i64(f: f64) -> Option<i64> {
    // i64::MAX is not representable; the open upper bound keeps the cast exact.
    (f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

fn to_i32(i: i64) -> Option<i32> {
    i32::try_from(i).ok()
}
