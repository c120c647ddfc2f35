//! Field-name translation between caller and wire conventions
//!
//! Callers name fields in camelCase (`perPage`, `orderBy`); the API expects
//! snake_case (`per_page`, `order_by`). Translation is applied to request
//! bodies and query parameters only. Response bodies are passed through
//! untouched.

use serde_json::Value;

/// Convert a single camelCase name to snake_case
///
/// A separator is inserted before every ASCII uppercase letter that is not
/// the first character, then the whole name is lowercased. Acronyms are
/// therefore split letter by letter (`userID` becomes `user_i_d`).
pub fn decamelize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if i > 0 && ch.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(ch);
    }
    out.to_lowercase()
}

/// Recursively translate every object key in a JSON value
///
/// Arrays are walked element by element; scalar values are returned
/// unchanged.
pub fn decamelize_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, inner)| (decamelize(key), decamelize_keys(inner)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(decamelize_keys).collect()),
        other => other.clone(),
    }
}

/// Translate the keys of a JSON object, recursing into nested values
pub fn decamelize_object(map: &serde_json::Map<String, Value>) -> serde_json::Map<String, Value> {
    map.iter()
        .map(|(key, inner)| (decamelize(key), decamelize_keys(inner)))
        .collect()
}
