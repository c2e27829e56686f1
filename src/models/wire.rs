//! Record decoding at the storage boundary.
//!
//! Student and tutor records reach the service in two encodings: plain JSON,
//! or the key-value store's tagged form where every value is wrapped in a
//! single-key object naming its type (`{"S": "Math"}`, `{"L": [...]}`,
//! `{"M": {...}}`). Everything here converts either form into the canonical
//! records in [`crate::models::domain`], so the matcher never sees an
//! encoding.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeSet;

use crate::models::domain::{AvailabilitySlot, StudentRecord, TutorRecord};

/// Type tags understood by [`unwrap_tagged`]
const TYPE_TAGS: &[&str] = &["S", "N", "BOOL", "NULL", "L", "M", "SS", "NS"];

/// Recursively rewrite tagged values into plain JSON.
///
/// An object counts as a wrapper only when it has exactly one key and that
/// key is a known type tag. Plain values pass through unchanged.
pub fn unwrap_tagged(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match single_tag(&map) {
            Some(tag) => {
                let inner = map.remove(&tag).unwrap_or(Value::Null);
                decode_tag(&tag, inner)
            }
            None => Value::Object(unwrap_fields(map)),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(unwrap_tagged).collect()),
        other => other,
    }
}

fn single_tag(map: &Map<String, Value>) -> Option<String> {
    if map.len() != 1 {
        return None;
    }
    map.keys().next().filter(|key| TYPE_TAGS.contains(&key.as_str())).cloned()
}

fn unwrap_fields(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter().map(|(key, value)| (key, unwrap_tagged(value))).collect()
}

fn decode_tag(tag: &str, inner: Value) -> Value {
    match (tag, inner) {
        ("NULL", _) => Value::Null,
        ("N", Value::String(raw)) => parse_number(raw),
        ("L" | "SS" | "NS", Value::Array(items)) => {
            let numeric = tag == "NS";
            Value::Array(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(raw) if numeric => parse_number(raw),
                        other => unwrap_tagged(other),
                    })
                    .collect(),
            )
        }
        ("M", Value::Object(fields)) => Value::Object(unwrap_fields(fields)),
        (_, inner) => inner,
    }
}

fn parse_number(raw: String) -> Value {
    raw.parse::<Number>().map(Value::Number).unwrap_or(Value::String(raw))
}

/// Decode a student record from either encoding. Never fails.
pub fn decode_student(value: &Value) -> StudentRecord {
    decode_record(value)
}

/// Decode a tutor record from either encoding. Never fails.
pub fn decode_tutor(value: &Value) -> TutorRecord {
    decode_record(value)
}

pub fn decode_tutors(values: &[Value]) -> Vec<TutorRecord> {
    values.iter().map(decode_tutor).collect()
}

fn decode_record<T: DeserializeOwned + Default>(value: &Value) -> T {
    serde_json::from_value(unwrap_tagged(value.clone())).unwrap_or_else(|e| {
        tracing::warn!("Record is not an object, treating as empty: {}", e);
        T::default()
    })
}

/// Deserialize a field, falling back to its default when the value has the
/// wrong shape
///
/// Numbers are retried in their string form so numeric ids (`{"N": "42"}`)
/// land in `String` fields.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => Ok(serde_json::from_value(Value::Number(n.clone()))
            .or_else(|_| serde_json::from_value(Value::String(n.to_string())))
            .unwrap_or_default()),
        value => Ok(serde_json::from_value(value).unwrap_or_default()),
    }
}

/// Deserialize a set of strings, keeping string and numeric members
pub(crate) fn string_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Ok(BTreeSet::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect())
}

/// Deserialize availability, dropping slots that fail validation
pub(crate) fn slot_list<'de, D>(deserializer: D) -> Result<Vec<AvailabilitySlot>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<AvailabilitySlot>(item) {
            Ok(slot) => Some(slot),
            Err(e) => {
                tracing::warn!("Dropping invalid availability slot: {}", e);
                None
            }
        })
        .collect())
}
