//! Contract evaluation engine
//!
//! This module provides the gate pipeline that turns a raw, untrusted request
//! into a single versioned, hashed response:
//!
//! ```text
//! VersionGate -> ShapeGate -> SignalValidation -> Dedup+Aggregate -> ResponseAssembly
//! ```
//!
//! The pipeline is strictly sequential with early exit: the first fatal
//! condition short-circuits straight to response assembly with
//! `decision = ERROR` and the gate's reason code, and no downstream gate
//! executes. The evaluator is a pure, synchronous, stateless function of its
//! input plus the immutable [`GateConfig`]; concurrent calls share nothing
//! mutable.

pub mod aggregate;
pub mod canonical;
pub mod dedup;
pub mod fingerprint;
pub mod numeric;
pub mod schema;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::GateConfig;
use crate::contracts::{
    Decision, GateFailure, ReasonCode, Request, Response, ResponseMeta, SignalEnvelope,
};
use aggregate::AggregationResult;
use dedup::DedupStats;
use schema::SchemaValidator;

/// The contract evaluator: the component callers invoke.
///
/// Holds only immutable configuration; safe to share across threads for the
/// lifetime of the process.
#[derive(Debug, Clone)]
pub struct ContractEvaluator {
    config: GateConfig,
    /// Precomputed fingerprint of the active limits, folded into every
    /// response context hash.
    config_fingerprint: String,
}

impl Default for ContractEvaluator {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}

impl ContractEvaluator {
    pub fn new(config: GateConfig) -> Self {
        let config_fingerprint = config.fingerprint();
        Self {
            config,
            config_fingerprint,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Evaluate a raw request and return the contract response.
    ///
    /// Total for classifiable input: every malformed request yields a
    /// well-formed ERROR response rather than an error return. Only a
    /// programming defect can escape as a panic, and such a panic never
    /// corrupts other in-flight calls (there is no shared mutable state).
    pub fn evaluate(&self, raw: &Value) -> Response {
        let request_id = safe_request_id(raw);

        if let Err(failure) = self.version_gate(raw) {
            return self.fail(request_id, failure);
        }
        if let Err(failure) = self.shape_gate(raw) {
            return self.fail(request_id, failure);
        }

        let request = match self.signal_validation(raw) {
            Ok(request) => request,
            Err(failure) => return self.fail(request_id, failure),
        };

        let (retained, stats) = dedup::dedup_signals(request.signals);
        let aggregation = aggregate::aggregate(&retained, stats);
        debug!(
            input_signals = stats.input_signals,
            retained_signals = stats.retained_signals,
            decision = %aggregation.decision,
            "gate aggregation complete"
        );

        self.assemble(request.request_id, &retained, aggregation)
    }

    // ----------------------------
    // Gates
    // ----------------------------

    /// Checks `contract_version` before anything else is parsed or validated.
    fn version_gate(&self, raw: &Value) -> Result<(), GateFailure> {
        let map = raw
            .as_object()
            .ok_or_else(|| GateFailure::new(ReasonCode::TypeMismatch, "request is not an object"))?;

        match map.get("contract_version") {
            Some(Value::Number(n)) if n.as_u64() == Some(self.config.supported_version) => Ok(()),
            Some(_) => Err(GateFailure::new(ReasonCode::BadVersion, "contract_version")),
            None => Err(GateFailure::new(ReasonCode::BadVersion, "contract_version missing")),
        }
    }

    /// Checks signal count, nesting depth, node count, and canonical byte
    /// size against hard limits, before any field-level validation.
    fn shape_gate(&self, raw: &Value) -> Result<(), GateFailure> {
        // Depth and node bounds first: everything after this (including the
        // canonical encoding below) may recurse over the structure.
        numeric::check_bounds(raw, &self.config)?;

        if let Some(signals) = raw.get("signals").and_then(Value::as_array) {
            if signals.len() > self.config.max_signals {
                return Err(GateFailure::new(ReasonCode::TooLarge, "max_signals"));
            }
        }

        let encoded = canonical::canonical_bytes(raw);
        if encoded.len() > self.config.max_request_bytes {
            return Err(GateFailure::new(ReasonCode::TooLarge, "max_request_bytes"));
        }

        Ok(())
    }

    /// Numeric guard over the whole structure, then strict schema validation
    /// of the request and of each signal envelope independently.
    fn signal_validation(&self, raw: &Value) -> Result<Request, GateFailure> {
        numeric::check_finite(raw)?;

        let request = SchemaValidator::new(&self.config).validate_request(raw)?;

        if request.component != self.config.component {
            return Err(GateFailure::new(
                ReasonCode::ComponentMismatch,
                request.component,
            ));
        }

        Ok(request)
    }

    // ----------------------------
    // Response assembly
    // ----------------------------

    fn assemble(
        &self,
        request_id: String,
        retained: &[SignalEnvelope],
        aggregation: AggregationResult,
    ) -> Response {
        let hash_views: Vec<Value> = retained.iter().map(signal_hash_view).collect();
        let output_views: Vec<Value> = retained.iter().map(signal_output_view).collect();

        let context_hash = fingerprint::context_hash(&json!({
            "component": self.config.component,
            "contract_version": self.config.supported_version,
            "signals": hash_views,
            "aggregation": aggregation,
            "config": self.config_fingerprint,
        }));

        let mut reason_codes = vec![aggregation.rollup_code().as_str().to_string()];
        reason_codes.extend(aggregation.reason_codes.iter().cloned());

        let decision = aggregation.decision;
        let evidence = json!({
            "summary": {
                "counts_by_decision": aggregation.counts_by_decision,
                "counts_by_component": aggregation.counts_by_component,
                "reason_codes": aggregation.reason_codes,
            },
            "dedup": aggregation.dedup,
            "signals": output_views,
        });

        Response {
            contract_version: self.config.supported_version,
            component: self.config.component.clone(),
            request_id,
            context_hash,
            decision,
            reason_codes,
            evidence,
            meta: ResponseMeta {
                fail_closed: decision == Decision::Error,
                latency_ms: 0,
            },
        }
    }

    /// Terminal ERROR response for a gate failure. Deterministic like the
    /// success path: the error context hash covers the identifying fields
    /// and the failure code, nothing time- or order-dependent.
    fn fail(&self, request_id: String, failure: GateFailure) -> Response {
        warn!(code = %failure.code, detail = %failure.detail, "gate failed closed");

        let context_hash = fingerprint::context_hash(&json!({
            "component": self.config.component,
            "contract_version": self.config.supported_version,
            "request_id": request_id,
            "reason_code": failure.code.as_str(),
        }));

        let mut details = json!({
            "error": failure.code.as_str(),
            "detail": failure.detail,
        });
        if let Some(index) = failure.signal_index {
            details["signal_index"] = json!(index);
        }

        Response {
            contract_version: self.config.supported_version,
            component: self.config.component.clone(),
            request_id,
            context_hash,
            decision: Decision::Error,
            reason_codes: vec![failure.code.as_str().to_string()],
            evidence: json!({ "details": details }),
            meta: ResponseMeta {
                fail_closed: true,
                latency_ms: 0,
            },
        }
    }
}

/// Best-effort request id for error responses on requests too malformed to
/// validate. Never interpreted, only echoed.
fn safe_request_id(raw: &Value) -> String {
    raw.get("request_id")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

/// The stable subset of an envelope that feeds the response context hash.
fn signal_hash_view(signal: &SignalEnvelope) -> Value {
    json!({
        "contract_version": signal.contract_version,
        "component": signal.component,
        "request_id": signal.request_id,
        "context_hash": signal.context_hash,
        "decision": signal.decision,
        "risk": signal.risk,
        "reason_codes": signal.reason_codes,
    })
}

/// The stable, non-leaky view of an envelope exposed in response evidence.
/// Opaque payloads (`evidence`, `meta`) stay with the upstream and are not
/// echoed downstream.
fn signal_output_view(signal: &SignalEnvelope) -> Value {
    json!({
        "component": signal.component,
        "request_id": signal.request_id,
        "context_hash": signal.context_hash,
        "decision": signal.decision,
        "risk": signal.risk,
        "reason_codes": signal.reason_codes,
    })
}

/// Dedup statistics recorded in a response, if it carries any.
///
/// Error responses report failure details instead of aggregation evidence, so
/// this returns zeros for them; telemetry uses it to label gate events.
pub fn response_dedup_stats(response: &Response) -> DedupStats {
    let read = |key: &str| {
        response.evidence["dedup"][key]
            .as_u64()
            .unwrap_or(0) as usize
    };
    DedupStats {
        input_signals: read("input_signals"),
        retained_signals: read("retained_signals"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn evaluator() -> ContractEvaluator {
        ContractEvaluator::default()
    }

    fn signal(context_hash: &str, decision: &str, risk: f64) -> Value {
        json!({
            "contract_version": 3,
            "component": "sentinel",
            "request_id": format!("req-{context_hash}"),
            "context_hash": context_hash,
            "decision": decision,
            "risk": risk,
            "reason_codes": ["SNTL_SIGNAL"],
            "evidence": {},
            "meta": {"fail_closed": true},
        })
    }

    fn request(signals: Vec<Value>) -> Value {
        json!({
            "contract_version": 3,
            "component": "signal-gate",
            "request_id": "test-request",
            "signals": signals,
        })
    }

    #[test]
    fn test_happy_path_block_dominates() {
        let response = evaluator().evaluate(&request(vec![
            signal("a", "WARN", 0.4),
            signal("b", "BLOCK", 0.9),
        ]));

        assert_eq!(response.decision, Decision::Block);
        assert!(!response.meta.fail_closed);
        assert_eq!(response.meta.latency_ms, 0);
        assert_eq!(response.request_id, "test-request");
        assert_eq!(response.evidence["summary"]["counts_by_decision"]["WARN"], 1);
        assert_eq!(response.evidence["summary"]["counts_by_decision"]["BLOCK"], 1);
        assert_eq!(response.evidence["dedup"]["input_signals"], 2);
        assert_eq!(response.evidence["dedup"]["retained_signals"], 2);
        assert_eq!(response.reason_codes[0], "SGATE_DENY_BLOCK");
    }

    #[test]
    fn test_wrong_version_fails_closed_before_anything_else() {
        // The unknown field would also be fatal, but the version gate runs
        // first and its code is the one reported.
        let raw = json!({
            "contract_version": 2,
            "component": "signal-gate",
            "request_id": "old",
            "signals": [],
            "mystery": 1,
        });
        let response = evaluator().evaluate(&raw);
        assert_eq!(response.decision, Decision::Error);
        assert!(response.meta.fail_closed);
        assert_eq!(response.reason_codes, ["SGATE_ERROR_BAD_VERSION"]);
        assert_eq!(response.request_id, "old");
    }

    #[test]
    fn test_missing_version_fails_closed() {
        let response = evaluator().evaluate(&json!({"request_id": "x"}));
        assert_eq!(response.reason_codes, ["SGATE_ERROR_BAD_VERSION"]);
        assert!(response.meta.fail_closed);
    }

    #[test]
    fn test_non_object_request_fails_closed() {
        for raw in [json!([1, 2]), json!("req"), json!(null), json!(3)] {
            let response = evaluator().evaluate(&raw);
            assert_eq!(response.decision, Decision::Error);
            assert!(response.meta.fail_closed);
            assert_eq!(response.request_id, "unknown");
        }
    }

    #[test]
    fn test_signal_count_limit() {
        let config = GateConfig::default().with_max_signals(2);
        let gate = ContractEvaluator::new(config);
        let response = gate.evaluate(&request(vec![
            signal("a", "ALLOW", 0.0),
            signal("b", "ALLOW", 0.0),
            signal("c", "ALLOW", 0.0),
        ]));
        assert_eq!(response.reason_codes, ["SGATE_ERROR_TOO_LARGE"]);
        assert_eq!(response.evidence["details"]["detail"], "max_signals");
    }

    #[test]
    fn test_component_mismatch_fails_closed() {
        let mut raw = request(vec![]);
        raw["component"] = json!("other-gate");
        let response = evaluator().evaluate(&raw);
        assert_eq!(response.reason_codes, ["SGATE_ERROR_COMPONENT_MISMATCH"]);
    }

    #[test]
    fn test_empty_signals_allow() {
        let response = evaluator().evaluate(&request(vec![]));
        assert_eq!(response.decision, Decision::Allow);
        assert!(!response.meta.fail_closed);
        assert_eq!(response.reason_codes, ["SGATE_OK_ALLOW"]);
        assert_eq!(response.evidence["dedup"]["input_signals"], 0);
    }

    #[test]
    fn test_invalid_signal_reports_index() {
        let response = evaluator().evaluate(&request(vec![
            signal("a", "ALLOW", 0.0),
            signal("b", "MAYBE", 0.0),
        ]));
        assert_eq!(response.reason_codes, ["SGATE_ERROR_INVALID_SIGNAL"]);
        assert_eq!(response.evidence["details"]["signal_index"], 1);
    }

    #[test]
    fn test_dedup_collapses_by_context_hash() {
        let response = evaluator().evaluate(&request(vec![
            signal("same", "WARN", 0.5),
            signal("same", "BLOCK", 0.9),
            signal("other", "ALLOW", 0.0),
        ]));
        // First occurrence of "same" wins, so its WARN decides the rollup.
        assert_eq!(response.decision, Decision::Warn);
        assert_eq!(response.evidence["dedup"]["input_signals"], 3);
        assert_eq!(response.evidence["dedup"]["retained_signals"], 2);
    }

    #[test]
    fn test_determinism_byte_identical() {
        let raw = request(vec![signal("a", "WARN", 0.4), signal("b", "BLOCK", 0.9)]);
        let gate = evaluator();
        let first = serde_json::to_vec(&gate.evaluate(&raw)).unwrap();
        let second = serde_json::to_vec(&gate.evaluate(&raw)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_error_responses_are_deterministic_too() {
        let raw = json!({"contract_version": 1});
        let gate = evaluator();
        assert_eq!(gate.evaluate(&raw), gate.evaluate(&raw));
    }

    #[test]
    fn test_context_hash_tracks_config() {
        let raw = request(vec![signal("a", "ALLOW", 0.0)]);
        let default_gate = evaluator();
        let tighter = ContractEvaluator::new(GateConfig::default().with_max_signals(8));
        assert_ne!(
            default_gate.evaluate(&raw).context_hash,
            tighter.evaluate(&raw).context_hash
        );
    }

    #[test]
    fn test_response_dedup_stats_helper() {
        let response = evaluator().evaluate(&request(vec![
            signal("a", "ALLOW", 0.0),
            signal("a", "ALLOW", 0.0),
        ]));
        let stats = response_dedup_stats(&response);
        assert_eq!(stats.input_signals, 2);
        assert_eq!(stats.retained_signals, 1);

        let error = evaluator().evaluate(&json!({"contract_version": 9}));
        let stats = response_dedup_stats(&error);
        assert_eq!(stats.input_signals, 0);
    }
}
