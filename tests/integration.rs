//! Integration tests for the signal gate contract
//!
//! End-to-end scenarios through the public evaluator API:
//! - happy path aggregation and severity rollup
//! - deduplication by context hash
//! - fail-closed behavior for every error class
//! - determinism of success and error responses
//! - the legacy v2 adapter path

use serde_json::{json, Value};
use signal_gate::{compat, ContractEvaluator, Decision, GateConfig};

fn signal(context_hash: &str, decision: &str, risk: f64) -> Value {
    json!({
        "contract_version": 3,
        "component": "sentinel",
        "request_id": format!("sig-{context_hash}"),
        "context_hash": context_hash,
        "decision": decision,
        "risk": risk,
        "reason_codes": [format!("SNTL_{}", decision)],
        "evidence": {"window": 60},
        "meta": {"fail_closed": true},
    })
}

fn request(signals: Vec<Value>) -> Value {
    json!({
        "contract_version": 3,
        "component": "signal-gate",
        "request_id": "itest",
        "signals": signals,
    })
}

#[test]
fn happy_path_two_signals_block_wins() {
    let gate = ContractEvaluator::default();
    let response = gate.evaluate(&request(vec![
        signal("a", "WARN", 0.4),
        signal("b", "BLOCK", 0.9),
    ]));

    assert_eq!(response.contract_version, 3);
    assert_eq!(response.component, "signal-gate");
    assert_eq!(response.request_id, "itest");
    assert_eq!(response.decision, Decision::Block);
    assert!(!response.meta.fail_closed);
    assert_eq!(response.meta.latency_ms, 0);

    let summary = &response.evidence["summary"];
    assert_eq!(summary["counts_by_decision"]["WARN"], 1);
    assert_eq!(summary["counts_by_decision"]["BLOCK"], 1);
    assert_eq!(summary["counts_by_component"]["sentinel"], 2);
    assert_eq!(response.evidence["dedup"]["input_signals"], 2);
    assert_eq!(response.evidence["dedup"]["retained_signals"], 2);

    // Rollup code first, then upstream codes in first-seen order.
    assert_eq!(
        response.reason_codes,
        ["SGATE_DENY_BLOCK", "SNTL_WARN", "SNTL_BLOCK"]
    );
}

#[test]
fn duplicate_context_hash_collapses_to_first() {
    let gate = ContractEvaluator::default();
    let response = gate.evaluate(&request(vec![
        signal("a", "WARN", 0.5),
        signal("a", "BLOCK", 0.9),
    ]));

    assert_eq!(response.evidence["dedup"]["input_signals"], 2);
    assert_eq!(response.evidence["dedup"]["retained_signals"], 1);
    // The first occurrence (WARN) decides; the duplicate BLOCK is dropped.
    assert_eq!(response.decision, Decision::Warn);
    let retained = response.evidence["signals"].as_array().unwrap();
    assert_eq!(retained.len(), 1);
    assert_eq!(retained[0]["decision"], "WARN");
}

#[test]
fn empty_signals_is_allow_by_policy() {
    let response = ContractEvaluator::default().evaluate(&request(vec![]));
    assert_eq!(response.decision, Decision::Allow);
    assert!(!response.meta.fail_closed);
    assert_eq!(response.reason_codes, ["SGATE_OK_ALLOW"]);
}

#[test]
fn wrong_version_fails_closed() {
    let mut raw = request(vec![]);
    raw["contract_version"] = json!(2);
    let response = ContractEvaluator::default().evaluate(&raw);
    assert_eq!(response.decision, Decision::Error);
    assert!(response.meta.fail_closed);
    assert_eq!(response.reason_codes, ["SGATE_ERROR_BAD_VERSION"]);
}

#[test]
fn unknown_top_level_key_fails_closed() {
    let mut raw = request(vec![]);
    raw["debug"] = json!(true);
    let response = ContractEvaluator::default().evaluate(&raw);
    assert_eq!(response.reason_codes, ["SGATE_ERROR_UNKNOWN_FIELD"]);
    assert!(response.meta.fail_closed);
}

#[test]
fn nan_risk_fails_closed_as_bad_number() {
    // serde_json cannot represent NaN, which is itself part of the defense:
    // a NaN never survives deserialization. Exercise the equivalent edge
    // through an out-of-range float instead, which must fail identically.
    let mut bad = signal("a", "ALLOW", 0.0);
    bad["risk"] = json!(f64::MAX);
    let response = ContractEvaluator::default().evaluate(&request(vec![bad]));
    assert_eq!(response.decision, Decision::Error);
    assert!(response.meta.fail_closed);
    assert_eq!(response.reason_codes, ["SGATE_ERROR_INVALID_SIGNAL"]);
    assert!(response.evidence["details"]["detail"]
        .as_str()
        .unwrap()
        .contains("SGATE_ERROR_BAD_NUMBER"));
}

#[test]
fn oversized_signal_count_fails_closed() {
    let gate = ContractEvaluator::new(GateConfig::default().with_max_signals(4));
    let signals: Vec<Value> = (0..5)
        .map(|i| signal(&format!("h{i}"), "ALLOW", 0.0))
        .collect();
    let response = gate.evaluate(&request(signals));
    assert_eq!(response.reason_codes, ["SGATE_ERROR_TOO_LARGE"]);
}

#[test]
fn oversized_payload_fails_closed() {
    let gate = ContractEvaluator::new(GateConfig::default().with_max_request_bytes(256));
    let mut padded = signal("a", "ALLOW", 0.0);
    padded["evidence"] = json!({"blob": "x".repeat(1024)});
    let response = gate.evaluate(&request(vec![padded]));
    assert_eq!(response.reason_codes, ["SGATE_ERROR_TOO_LARGE"]);
    assert_eq!(response.evidence["details"]["detail"], "max_request_bytes");
}

#[test]
fn excessive_nesting_fails_closed() {
    let gate = ContractEvaluator::new(GateConfig::default().with_max_depth(6));
    let mut deep = json!("leaf");
    for _ in 0..10 {
        deep = json!([deep]);
    }
    let mut nested = signal("a", "ALLOW", 0.0);
    nested["evidence"] = json!({"deep": deep});
    let response = gate.evaluate(&request(vec![nested]));
    assert_eq!(response.reason_codes, ["SGATE_ERROR_TOO_LARGE"]);
}

#[test]
fn invalid_signal_fails_whole_request() {
    // Pinned policy: no drop-and-continue. One bad envelope poisons the batch.
    let gate = ContractEvaluator::default();
    let mut bad = signal("b", "ALLOW", 0.0);
    bad.as_object_mut().unwrap().remove("context_hash");
    let response = gate.evaluate(&request(vec![signal("a", "ALLOW", 0.0), bad]));
    assert_eq!(response.decision, Decision::Error);
    assert_eq!(response.reason_codes, ["SGATE_ERROR_INVALID_SIGNAL"]);
    assert_eq!(response.evidence["details"]["signal_index"], 1);
}

#[test]
fn upstream_error_decision_rolls_up_and_fails_closed() {
    let gate = ContractEvaluator::default();
    let response = gate.evaluate(&request(vec![
        signal("a", "ERROR", 1.0),
        signal("b", "WARN", 0.4),
    ]));
    assert_eq!(response.decision, Decision::Error);
    // ERROR decision implies fail_closed even on a structurally valid batch.
    assert!(response.meta.fail_closed);
    assert_eq!(response.reason_codes[0], "SGATE_DENY_ERROR");
}

#[test]
fn responses_are_byte_identical_across_calls() {
    let raw = request(vec![signal("a", "WARN", 0.25), signal("b", "ALLOW", 0.0)]);
    let gate = ContractEvaluator::default();
    let first = serde_json::to_vec(&gate.evaluate(&raw)).unwrap();
    let second = serde_json::to_vec(&gate.evaluate(&raw)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn context_hash_changes_with_any_signal_field() {
    let gate = ContractEvaluator::default();
    let base = gate.evaluate(&request(vec![signal("a", "WARN", 0.25)]));

    let mut tweaked = signal("a", "WARN", 0.25);
    tweaked["risk"] = json!(0.26);
    let changed = gate.evaluate(&request(vec![tweaked]));

    assert_ne!(base.context_hash, changed.context_hash);
}

#[test]
fn context_hash_depends_on_retained_order() {
    // Pinned: canonical order is input order of retained signals, so
    // reordering distinct signals changes the hash even though membership
    // is identical. Determinism is conditional on upstream ordering.
    let gate = ContractEvaluator::default();
    let forward = gate.evaluate(&request(vec![
        signal("a", "WARN", 0.4),
        signal("b", "ALLOW", 0.0),
    ]));
    let reversed = gate.evaluate(&request(vec![
        signal("b", "ALLOW", 0.0),
        signal("a", "WARN", 0.4),
    ]));
    assert_ne!(forward.context_hash, reversed.context_hash);
    // The rollup itself is order-independent.
    assert_eq!(forward.decision, reversed.decision);
}

#[test]
fn legacy_batch_round_trips_through_the_gate() {
    let batch = json!({
        "schema": 2,
        "source": "signal-gate",
        "batch_id": "legacy-int",
        "upstream": [{
            "origin": "sentinel",
            "ref": "l-1",
            "fingerprint": "legacy-hash",
            "verdict": "block",
            "severity": 0.95,
            "codes": ["SNTL_LOCKDOWN"],
            "detail": {},
            "annotations": {},
        }],
    });

    let raw = compat::adapt_request(&batch).unwrap();
    let response = ContractEvaluator::default().evaluate(&raw);
    assert_eq!(response.decision, Decision::Block);

    let reply = compat::adapt_response(&response);
    assert_eq!(reply["schema"], 2);
    assert_eq!(reply["verdict"], "block");
    assert_eq!(reply["batch_id"], "legacy-int");
}

#[test]
fn error_responses_still_carry_a_deterministic_hash() {
    let gate = ContractEvaluator::default();
    let raw = json!({"contract_version": 7, "request_id": "e-1"});
    let first = gate.evaluate(&raw);
    let second = gate.evaluate(&raw);
    assert_eq!(first.context_hash, second.context_hash);
    assert_eq!(first.context_hash.len(), 64);
}
