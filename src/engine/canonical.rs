//! Canonical encoder: byte-stable encoding of structured values
//!
//! Maps a structured value to a unique byte sequence so that semantically
//! equal values hash identically on every run and platform. Rules:
//!
//! - Mapping keys are sorted byte-wise, regardless of insertion order.
//! - Numbers keep serde_json's fixed rendering (itoa for integers, ryu
//!   shortest-roundtrip for floats); no locale or platform variance.
//! - Strings are encoded as their exact UTF-8 bytes, no normalization.
//!   Normalization would be a meaning-changing operation; if an upstream
//!   sends Unicode variants of the "same" string they hash differently.
//! - Compact separators, no whitespace.
//!
//! Callers are expected to have bounded the value's depth already (the shape
//! gate runs first); the sort here is recursive.

use serde_json::Value;

/// Rebuild a value with all object keys sorted byte-wise, recursively.
/// Array order is preserved: sequences are ordered data, not sets.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, item) in entries {
                out.insert(key.clone(), canonicalize(item));
            }
            Value::Object(out)
        }
        scalar => scalar.clone(),
    }
}

/// The canonical byte encoding of a value.
pub fn canonical_bytes(value: &Value) -> Vec<u8> {
    // Serialization of a Value cannot fail once NaN/Infinity are excluded,
    // which the numeric guard guarantees for everything reaching here.
    serde_json::to_vec(&canonicalize(value)).unwrap_or_else(|_| b"null".to_vec())
}

/// The canonical encoding as a string, mainly for tests and logging.
pub fn canonical_string(value: &Value) -> String {
    String::from_utf8(canonical_bytes(value)).unwrap_or_else(|_| "null".to_string())
}
