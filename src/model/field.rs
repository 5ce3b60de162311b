use serde_json::{Map, Value};
use thiserror::Error;

use crate::util::adf::extract_text_from_adf;

/// Attributes that usually carry a human-readable label, tried in order when
/// a structured value has to be shown as text.
const READABLE_IDS: &[&str] = &[
    "displayName",
    "key",
    "name",
    "accountId",
    "filename",
    "value",
    "scope",
    "votes",
    "id",
    "mimeType",
    "closed",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field path '{path}' has no '{segment}'")]
pub struct PathNotFound {
    pub path: String,
    pub segment: String,
}

/// Walk a dotted path (`status.name`) through nested objects.
///
/// A missing key, a null or a non-object value in the middle of the path all
/// count as "not found". A null at the very end is a real value and is
/// returned as such.
pub fn resolve<'a>(fields: &'a Map<String, Value>, path: &str) -> Result<&'a Value, PathNotFound> {
    let not_found = |segment: &str| PathNotFound {
        path: path.to_string(),
        segment: segment.to_string(),
    };

    let mut segments = path.split('.');
    let first = segments.next().unwrap_or_default();
    let mut current = fields.get(first).ok_or_else(|| not_found(first))?;

    for segment in segments {
        current = current
            .as_object()
            .and_then(|obj| obj.get(segment))
            .ok_or_else(|| not_found(segment))?;
    }
    Ok(current)
}

/// Like [`resolve`], but falls back to `default` on any missing segment.
pub fn get_or(fields: &Map<String, Value>, path: &str, default: &str) -> Value {
    resolve(fields, path)
        .map(Value::clone)
        .unwrap_or_else(|_| Value::String(default.to_string()))
}

/// Reduce a value to a primitive (string, number, bool or null) so every
/// output format can deal with it directly.
pub fn flatten(value: &Value) -> Value {
    match value {
        Value::Object(_) | Value::Array(_) => Value::String(describe(value)),
        other => other.clone(),
    }
}

/// Plain text for a cell in a table or CSV file. Null renders empty.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(_) | Value::Array(_) => describe(value),
    }
}

fn describe(value: &Value) -> String {
    let text = match value {
        Value::Object(obj) => {
            let adf = if obj.get("type").and_then(Value::as_str) == Some("doc") {
                extract_text_from_adf(value)
            } else {
                None
            };
            adf.or_else(|| {
                READABLE_IDS
                    .iter()
                    .filter_map(|id| obj.get(*id))
                    .map(to_text)
                    .find(|label| !label.is_empty())
            })
            .unwrap_or_default()
        }
        Value::Array(items) => items
            .iter()
            .map(to_text)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => to_text(other),
    };
    // structured values never render blank
    if text.is_empty() && (value.is_object() || value.is_array()) {
        value.to_string()
    } else {
        text
    }
}
