// src/records/fields.rs
//! Optional-field accessors over untyped record JSON.
//!
//! The private API gives no schema guarantees, so every accessor answers
//! `None` for a missing field *and* for a field of the wrong type. Callers
//! decide whether absence means "omit" or "false"; nothing here substitutes
//! a default.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// A record as it appears after unwrapping: a JSON object.
pub type Record = Map<String, Value>;

/// Returns a non-empty string field.
pub fn non_empty_str<'a>(record: &'a Record, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

pub fn bool_field(record: &Record, key: &str) -> Option<bool> {
    record.get(key).and_then(Value::as_bool)
}

pub fn object_field<'a>(record: &'a Record, key: &str) -> Option<&'a Record> {
    record.get(key).and_then(Value::as_object)
}

/// Returns an array field only when it holds at least one element.
pub fn non_empty_array<'a>(record: &'a Record, key: &str) -> Option<&'a Vec<Value>> {
    record
        .get(key)
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
}

/// Reads an epoch-milliseconds field and renders it as RFC 3339 UTC.
pub fn timestamp_field(record: &Record, key: &str) -> Option<String> {
    record.get(key).and_then(millis_to_rfc3339)
}

/// Converts epoch milliseconds to an RFC 3339 UTC string.
///
/// Integers and floats are both accepted (floats truncate toward zero).
/// Non-positive, non-numeric or out-of-range values yield `None`.
pub fn millis_to_rfc3339(value: &Value) -> Option<String> {
    let millis = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
        _ => return None,
    };
    if millis <= 0 {
        return None;
    }
    let at = DateTime::<Utc>::from_timestamp_millis(millis)?;
    Some(at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Minimal user reference standing in for a full user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialUser {
    pub object: &'static str,
    pub id: String,
}

impl PartialUser {
    /// Builds a reference, or `None` for a blank ID.
    pub fn from_id(id: &str) -> Option<Self> {
        if id.trim().is_empty() {
            return None;
        }
        Some(Self {
            object: "user",
            id: id.to_string(),
        })
    }
}
