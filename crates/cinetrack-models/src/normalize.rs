//! Tolerant readers for stored document fields.
//!
//! Stored lists were written by several client versions, so numbers may
//! arrive as strings, timestamps in more than one encoding and genres either
//! as a comma separated string or as a list. Every reader here maps a
//! malformed or missing value to `None`/empty instead of failing.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::media::WatchStatus;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

/// Find the first non-null value under `name` or one of its legacy names
pub fn lookup<'a>(fields: &'a Map<String, Value>, name: &str, legacy: &[&str]) -> Option<&'a Value> {
    std::iter::once(name)
        .chain(legacy.iter().copied())
        .filter_map(|key| fields.get(key))
        .find(|value| !value.is_null())
}

pub fn read_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn read_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

pub fn read_u32(value: Option<&Value>) -> Option<u32> {
    read_u64(value).and_then(|n| u32::try_from(n).ok())
}

/// Positive counters (season/episode numbers); zero is treated as unset
pub fn read_positive_u32(value: Option<&Value>) -> Option<u32> {
    read_u32(value).filter(|n| *n > 0)
}

pub fn read_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub fn read_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Accepts `{seconds, nanoseconds}` objects, RFC 3339 strings and epoch seconds
pub fn read_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::Object(obj) => {
            let seconds = obj.get("seconds").and_then(Value::as_i64)?;
            let nanos = obj
                .get("nanoseconds")
                .or_else(|| obj.get("nanos"))
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            Utc.timestamp_opt(seconds, nanos).single()
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        _ => None,
    }
}

/// Normalize a genre field into a list of trimmed, non-empty names.
///
/// Accepts `"Drama, Action"`, `["Drama", "Action"]` and catalog style
/// `[{"id": 18, "name": "Drama"}]`.
pub fn normalize_genres(value: Option<&Value>) -> Vec<String> {
    let names: Vec<String> = match value {
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Read a stored score. Zero and non-numeric values mean "no score".
pub fn read_score(value: Option<&Value>) -> Option<u8> {
    let raw = read_f64(value)?;
    if raw < f64::from(MIN_SCORE) {
        return None;
    }
    Some(raw.round().min(f64::from(MAX_SCORE)) as u8)
}

/// Score to store for an entry with the given status: cleared unless the
/// status accepts a score, otherwise clamped into range.
pub fn normalize_score(status: WatchStatus, score: Option<u8>) -> Option<u8> {
    if !status.accepts_score() {
        return None;
    }
    score.map(|s| s.clamp(MIN_SCORE, MAX_SCORE))
}
