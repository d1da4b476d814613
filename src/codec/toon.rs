//! Compact line-oriented "toon" notation.
//!
//! Objects become `key: value` lines with each value in compact JSON. Arrays
//! of records become a tabular block:
//!
//! ```text
//! name,value[2]:
//!   primary,#4DA3FF
//!   secondary,#1F2937
//! ```
//!
//! There is no decoder; the notation only exists to measure how much a
//! metadata header costs in each encoding.

use serde_json::{Map, Value};

/// Encodes a JSON value in toon notation.
#[must_use]
pub fn encode(value: &Value) -> String {
    match value {
        Value::Object(map) => encode_object(map),
        Value::Array(items) => encode_array(items),
        scalar => scalar_text(scalar),
    }
}

/// Encodes an object as `key: <compact JSON>` lines.
#[must_use]
pub fn encode_object(map: &Map<String, Value>) -> String {
    map.iter()
        .map(|(key, value)| format!("{key}: {}", compact_json(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn encode_array(items: &[Value]) -> String {
    let Some(first) = items.first() else {
        return "[]".to_string();
    };

    let Value::Object(first_record) = first else {
        let row: Vec<String> = items.iter().map(cell_text).collect();
        return format!("[{}]: {}", items.len(), row.join(","));
    };

    let keys: Vec<&String> = first_record.keys().collect();
    let header = format!(
        "{}[{}]:",
        keys.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(","),
        items.len()
    );

    let rows: Vec<String> = items
        .iter()
        .map(|item| {
            keys.iter()
                .map(|key| item.get(key.as_str()).map_or_else(String::new, cell_text))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();

    format!("{header}\n  {}", rows.join("\n  "))
}

/// Text for one table cell: scalars bare, `null` empty, nested values as JSON.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => compact_json(value),
        scalar => scalar_text(scalar),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compact_json(value: &Value) -> String {
    // Display on Value is compact JSON and cannot fail.
    value.to_string()
}
