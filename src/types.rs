//! Common types used throughout reel-loader

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;
