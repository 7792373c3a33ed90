//! Inbound contract types: Request and SignalEnvelope
//!
//! These are the *validated* forms. Raw requests arrive as untyped JSON and
//! only become a [`Request`] by passing the schema validator; nothing in the
//! pipeline constructs them from unchecked input.
//!
//! # Design Principles
//!
//! - **Strict allowlist**: unknown keys invalidate the request, they are never
//!   masked or ignored.
//! - **Call-scoped**: a Request is created per evaluation, consumed, and
//!   dropped. No component retains request data after returning.
//! - **Opaque payloads**: `evidence` and `meta` on an envelope are structurally
//!   validated (finite, bounded) but never semantically interpreted here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upstream/downstream decision vocabulary, ordered by severity.
///
/// Severity order is a fixed contract rule: `BLOCK > ERROR > WARN > ALLOW`.
/// The most severe decision present in a batch wins the rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Allow,
    Warn,
    Error,
    Block,
}

impl Decision {
    /// Numeric severity rank; higher dominates in the rollup.
    pub fn severity(self) -> u8 {
        match self {
            Decision::Allow => 0,
            Decision::Warn => 1,
            Decision::Error => 2,
            Decision::Block => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Allow => "ALLOW",
            Decision::Warn => "WARN",
            Decision::Error => "ERROR",
            Decision::Block => "BLOCK",
        }
    }

    /// The more severe of two decisions.
    pub fn max_severity(self, other: Decision) -> Decision {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = ();

    /// Parses the closed decision set. Anything else is rejected, not passed
    /// through; there is no catch-all variant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALLOW" => Ok(Decision::Allow),
            "WARN" => Ok(Decision::Warn),
            "ERROR" => Ok(Decision::Error),
            "BLOCK" => Ok(Decision::Block),
            _ => Err(()),
        }
    }
}

/// A validated signal envelope from an upstream component.
///
/// The envelope is re-validated here but never re-derived: `context_hash` is
/// the upstream's own fingerprint and is used verbatim as the dedup key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEnvelope {
    /// Contract version the upstream produced this envelope under.
    pub contract_version: u64,
    /// Identifier of the producing component.
    pub component: String,
    /// Upstream's opaque request identifier.
    pub request_id: String,
    /// Upstream's deterministic content fingerprint; dedup key.
    pub context_hash: String,
    /// The upstream's decision for its own scope.
    pub decision: Decision,
    /// Finite risk value in `[0.0, 1.0]`. Carried, never re-scored.
    pub risk: f64,
    /// Upstream reason codes. Unknown codes pass through opaquely.
    pub reason_codes: Vec<String>,
    /// Opaque structured payload; shape-validated only.
    pub evidence: serde_json::Value,
    /// Opaque structured metadata; shape-validated only.
    pub meta: serde_json::Value,
}

/// A validated gate request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Must equal the gate's supported contract version.
    pub contract_version: u64,
    /// Must equal the gate's configured component identity.
    pub component: String,
    /// Caller-supplied opaque identifier, echoed verbatim in the response.
    pub request_id: String,
    /// Ordered batch of upstream signal envelopes.
    pub signals: Vec<SignalEnvelope>,
    /// Optional opaque constraints object; structurally validated only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<serde_json::Value>,
}

/// Allowlisted top-level request keys. Anything else is fatal.
pub const REQUEST_KEYS: &[&str] = &[
    "contract_version",
    "component",
    "request_id",
    "signals",
    "constraints",
];

/// Required top-level request keys (`constraints` is optional).
pub const REQUEST_REQUIRED_KEYS: &[&str] =
    &["contract_version", "component", "request_id", "signals"];

/// Allowlisted signal envelope keys; all are required.
pub const SIGNAL_KEYS: &[&str] = &[
    "contract_version",
    "component",
    "request_id",
    "context_hash",
    "decision",
    "risk",
    "reason_codes",
    "evidence",
    "meta",
];
