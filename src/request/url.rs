//! URL joining and query-string encoding
//!
//! Pure string helpers shared by the request builder, the connection
//! context and the transport.

use crate::types::JsonObject;
use serde_json::Value;

/// Join URL segments with exactly one slash between them
///
/// Leading slashes are dropped from every segment but the first and trailing
/// slashes from every segment but the last. Empty segments are skipped. A
/// slash directly in front of the query string is removed.
pub fn join_url(parts: &[&str]) -> String {
    let parts: Vec<&str> = parts.iter().copied().filter(|p| !p.is_empty()).collect();
    let last = parts.len().saturating_sub(1);

    let mut joined = String::new();
    for (i, part) in parts.iter().enumerate() {
        let mut segment = *part;
        if i > 0 {
            segment = segment.trim_start_matches('/');
        }
        if i < last {
            segment = segment.trim_end_matches('/');
        }
        if segment.is_empty() {
            continue;
        }
        if !joined.is_empty() && !segment.starts_with('?') && !segment.starts_with('#') {
            joined.push('/');
        }
        joined.push_str(segment);
    }

    if let Some(pos) = joined.find('?') {
        if pos > 0 && joined[..pos].ends_with('/') && !joined[..pos].ends_with("//") {
            joined.remove(pos - 1);
        }
    }

    joined
}

/// Whether an endpoint is already an absolute URL
pub fn is_absolute(endpoint: &str) -> bool {
    endpoint.starts_with("http://") || endpoint.starts_with("https://")
}

/// Flatten a query record into ordered key/value pairs
///
/// Nested records become `key[sub]`, arrays become `key[]`, `null` becomes an
/// empty value. Empty arrays and records contribute nothing.
pub fn flatten_query(query: &JsonObject) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in query {
        push_pairs(key.clone(), value, &mut pairs);
    }
    pairs
}

fn push_pairs(prefix: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => pairs.push((prefix, String::new())),
        Value::Bool(b) => pairs.push((prefix, b.to_string())),
        Value::Number(n) => pairs.push((prefix, n.to_string())),
        Value::String(s) => pairs.push((prefix, s.clone())),
        Value::Array(items) => {
            for item in items {
                push_pairs(format!("{prefix}[]"), item, pairs);
            }
        }
        Value::Object(map) => {
            for (key, inner) in map {
                push_pairs(format!("{prefix}[{key}]"), inner, pairs);
            }
        }
    }
}

/// Percent-encode query pairs as `application/x-www-form-urlencoded`
pub fn encode_query(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish()
}

/// Append an encoded query string to a URL that may already carry one
pub fn append_query(url: &str, encoded: &str) -> String {
    if encoded.is_empty() {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{encoded}")
}
