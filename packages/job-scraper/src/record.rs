//! Flat, dotted-key rows built from loosely-typed JSON.
//!
//! Nested objects become `parent.child` keys. Arrays and scalars are leaves,
//! so `{"a": {"b": [1, 2]}}` flattens to `{"a.b": [1, 2]}`. An empty nested
//! object contributes no keys at all.

use indexmap::IndexMap;
use serde_json::Value;

/// One flattened record, keys in first-seen order.
pub type FlatRow = IndexMap<String, Value>;

/// Flatten a JSON value into a [`FlatRow`].
///
/// A non-object top-level value yields an empty row.
pub fn flatten(value: &Value) -> FlatRow {
    let mut row = FlatRow::new();
    if let Value::Object(map) = value {
        for (key, child) in map {
            flatten_into(&mut row, key.clone(), child);
        }
    }
    row
}

fn flatten_into(row: &mut FlatRow, key: String, value: &Value) {
    match value {
        Value::Object(map) => {
            for (child_key, child) in map {
                flatten_into(row, format!("{key}.{child_key}"), child);
            }
        }
        leaf => {
            row.insert(key, leaf.clone());
        }
    }
}

/// String field lookup; `None` when absent or not a string.
pub fn str_field<'a>(row: &'a FlatRow, key: &str) -> Option<&'a str> {
    row.get(key).and_then(Value::as_str)
}

/// Render a list as `"a, b, c"`, skipping empty elements. Non-lists pass through.
pub fn join_list(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::String(
            items
                .iter()
                .filter(|item| !is_blank(item))
                .map(display_value)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => other.clone(),
    }
}

/// Plain-text rendering of a cell: strings unquoted, null as empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}
