//! Legacy (v2) compatibility adapter
//!
//! Maps the retired v2 batch shape onto a v3 request before evaluation and
//! maps the v3 response back to the v2 reply shape afterwards. The adapter is
//! a pure field-name translation: it fabricates nothing beyond the version
//! stamp, substitutes no defaults for absent or malformed values, and never
//! bypasses a gate — a v2 batch that translates into an invalid v3 request
//! fails closed exactly like a native one.
//!
//! v2 batch shape:
//!
//! ```json
//! {
//!   "schema": 2,
//!   "source": "<caller>",
//!   "batch_id": "<opaque>",
//!   "upstream": [
//!     {
//!       "origin": "<producer>",
//!       "ref": "<opaque>",
//!       "fingerprint": "<dedup key>",
//!       "verdict": "allow|warn|block|error",
//!       "severity": 0.0,
//!       "codes": ["..."],
//!       "detail": {},
//!       "annotations": {}
//!     }
//!   ]
//! }
//! ```

use serde_json::{json, Map, Value};

use crate::contracts::Response;
use crate::error::{GateError, Result};

/// v2 field names and their v3 counterparts, at the batch level.
const BATCH_FIELDS: &[(&str, &str)] = &[
    ("source", "component"),
    ("batch_id", "request_id"),
];

/// v2 field names and their v3 counterparts, at the envelope level.
const ENVELOPE_FIELDS: &[(&str, &str)] = &[
    ("origin", "component"),
    ("ref", "request_id"),
    ("fingerprint", "context_hash"),
    ("severity", "risk"),
    ("codes", "reason_codes"),
    ("detail", "evidence"),
    ("annotations", "meta"),
];

/// Translate a v2 batch into a raw v3 request value.
///
/// Only the shape is translated; all contract validation remains with the
/// evaluator. Unrecognized v2 keys are carried across untranslated so the
/// strict allowlist still rejects them.
pub fn adapt_request(legacy: &Value) -> Result<Value> {
    let batch = legacy
        .as_object()
        .ok_or_else(|| GateError::invalid_input("legacy batch is not an object"))?;

    match batch.get("schema").and_then(Value::as_u64) {
        Some(2) => {}
        _ => return Err(GateError::invalid_input("legacy batch is not schema 2")),
    }

    let mut request = Map::new();
    request.insert("contract_version".to_string(), json!(3));

    for (key, value) in batch {
        match key.as_str() {
            "schema" => {}
            "upstream" => {
                let envelopes = value
                    .as_array()
                    .ok_or_else(|| GateError::invalid_input("legacy upstream is not an array"))?;
                let signals: Vec<Value> = envelopes.iter().map(adapt_envelope).collect();
                request.insert("signals".to_string(), Value::Array(signals));
            }
            other => {
                // A batch carrying both a legacy key and its v3 counterpart
                // keeps the legacy name, so the allowlist rejects it instead
                // of letting one field shadow the other.
                let renamed = rename(BATCH_FIELDS, other);
                let target = if renamed != other && batch.contains_key(renamed) {
                    other
                } else {
                    renamed
                };
                request.insert(target.to_string(), value.clone());
            }
        }
    }

    Ok(Value::Object(request))
}

/// Translate one v2 upstream entry into a v3 signal envelope shape.
fn adapt_envelope(legacy: &Value) -> Value {
    let Some(entry) = legacy.as_object() else {
        // Not an object: pass through untouched and let the gate reject it.
        return legacy.clone();
    };

    let mut signal = Map::new();
    // v2 envelopes predate per-envelope versioning; the batch-level schema
    // check above is what authorizes stamping them as v3-shaped.
    signal.insert("contract_version".to_string(), json!(3));

    for (key, value) in entry {
        let renamed = match key.as_str() {
            "verdict" if !entry.contains_key("decision") => {
                let translated = value
                    .as_str()
                    .map(|v| json!(v.to_ascii_uppercase()))
                    .unwrap_or_else(|| value.clone());
                signal.insert("decision".to_string(), translated);
                continue;
            }
            other => {
                let renamed = rename(ENVELOPE_FIELDS, other);
                if renamed != other && entry.contains_key(renamed) {
                    other
                } else {
                    renamed
                }
            }
        };
        signal.insert(renamed.to_string(), value.clone());
    }

    Value::Object(signal)
}

/// Translate a v3 response into the v2 reply shape.
pub fn adapt_response(response: &Response) -> Value {
    json!({
        "schema": 2,
        "source": response.component,
        "batch_id": response.request_id,
        "digest": response.context_hash,
        "verdict": response.decision.as_str().to_ascii_lowercase(),
        "codes": response.reason_codes,
        "report": response.evidence,
        "fail_closed": response.meta.fail_closed,
    })
}

fn rename<'a>(table: &[(&'a str, &'a str)], key: &'a str) -> &'a str {
    table
        .iter()
        .find(|(from, _)| *from == key)
        .map(|(_, to)| *to)
        .unwrap_or(key)
}
