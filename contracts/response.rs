//! Outbound contract types: Response and GateEvent
//!
//! The [`Response`] is the single versioned, hashed output of an evaluation.
//! It is deterministic by contract: `meta.latency_ms` is pinned to 0 and real
//! timing belongs to the out-of-band telemetry channel, never the payload.
//!
//! [`GateEvent`] is that out-of-band record: an append-only analytics entry
//! emitted to the structured log after each evaluation. It never feeds back
//! into the response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::request::Decision;

/// Deterministic response metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// `true` whenever `decision == ERROR`.
    pub fail_closed: bool,
    /// Fixed to 0 by contract; the payload carries no measured timing.
    pub latency_ms: u64,
}

/// The gate's versioned response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// The contract version this response was produced under.
    pub contract_version: u64,
    /// This gate's own component identity.
    pub component: String,
    /// The caller's request identifier, echoed verbatim.
    pub request_id: String,
    /// Canonical hash over validated signals, aggregation result, and the
    /// active configuration fingerprint.
    pub context_hash: String,
    /// Rollup decision, or ERROR on any fatal validation failure.
    pub decision: Decision,
    /// Stable codes: rollup outcome first, then distinct upstream codes in
    /// first-seen order (or the single failure code on the error path).
    pub reason_codes: Vec<String>,
    /// The aggregation result serialized (or failure details on error).
    pub evidence: serde_json::Value,
    pub meta: ResponseMeta,
}

impl Response {
    /// Whether this response reports a contract failure.
    pub fn is_error(&self) -> bool {
        self.decision == Decision::Error && self.meta.fail_closed
    }
}

/// Append-only analytics record for one gate evaluation.
///
/// Emitted after the response is assembled; immutable once created. Carries
/// the non-deterministic context (event id, wall-clock timestamp, measured
/// duration) that the response contract deliberately excludes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateEvent {
    /// Unique identifier for this event.
    pub event_id: Uuid,
    /// Gate identifier (e.g. "signal-gate").
    pub component: String,
    /// Gate version (semantic versioning).
    pub component_version: String,
    /// The caller's request identifier.
    pub request_id: String,
    /// The response decision.
    pub decision: Decision,
    /// The response reason codes.
    pub reason_codes: Vec<String>,
    /// The response context hash, for joining events to responses.
    pub context_hash: String,
    /// Signals received before deduplication.
    pub input_signals: usize,
    /// Signals retained after deduplication.
    pub retained_signals: usize,
    /// Measured evaluation duration in milliseconds.
    pub duration_ms: u64,
    /// Timestamp when the evaluation completed.
    pub timestamp: DateTime<Utc>,
}

impl GateEvent {
    /// Gate version recorded on every event.
    pub const COMPONENT_VERSION: &'static str = env!("CARGO_PKG_VERSION");

    /// Build an event from a finished response.
    ///
    /// Dedup counts come from the caller because error responses carry
    /// failure details rather than dedup statistics in their evidence.
    pub fn from_response(
        response: &Response,
        input_signals: usize,
        retained_signals: usize,
        duration_ms: u64,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            component: response.component.clone(),
            component_version: Self::COMPONENT_VERSION.to_string(),
            request_id: response.request_id.clone(),
            decision: response.decision,
            reason_codes: response.reason_codes.clone(),
            context_hash: response.context_hash.clone(),
            input_signals,
            retained_signals,
            duration_ms,
            timestamp: Utc::now(),
        }
    }
}
