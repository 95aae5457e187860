//! Header canonicalization.
//!
//! # Responsibilities
//! - Flatten raw header values (scalar or array, one level) into strings
//! - Join multi-value headers with `", "` in original element order
//! - Drop entries whose joined value ends up empty
//!
//! # Design Decisions
//! - Pure transform: takes the map explicitly, no shared state
//! - Non-string elements are discarded, not stringified
//! - Output key order follows input key order for the surviving keys

use indexmap::IndexMap;
use serde_json::Value;

use super::RawHeaders;

/// Canonicalize a raw header map into name -> comma-joined string.
pub fn canonicalize(raw: &RawHeaders) -> IndexMap<String, String> {
    let mut out = IndexMap::new();
    for (name, value) in raw {
        let joined = join_strings(value);
        if !joined.is_empty() {
            out.insert(name.clone(), joined);
        }
    }
    out
}

/// Flatten one level and keep only string elements, joined with `", "`.
fn join_strings(value: &Value) -> String {
    let parts: Vec<&str> = match value {
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        other => other.as_str().into_iter().collect(),
    };
    parts.join(", ")
}
