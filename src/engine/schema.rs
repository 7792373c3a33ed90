//! Schema validator: strict field-level validation of requests and envelopes
//!
//! Validates raw JSON against the two fixed contract schemas (Request,
//! SignalEnvelope) and produces strongly-typed values. The policy is a strict
//! allowlist, not a mask: unknown keys are fatal, missing required keys are
//! fatal, wrong types are fatal. There is no coercion anywhere — in
//! particular, booleans never satisfy integer- or float-typed fields.
//!
//! A total function of the input value and the fixed schema: the only
//! configuration-dependent branching is the declared limits.

use serde_json::Value;

use crate::config::GateConfig;
use crate::contracts::{
    Decision, GateFailure, ReasonCode, Request, SignalEnvelope, REQUEST_KEYS,
    REQUEST_REQUIRED_KEYS, SIGNAL_KEYS,
};
use crate::engine::numeric;

/// Validator bound to the immutable gate configuration.
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator<'a> {
    config: &'a GateConfig,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(config: &'a GateConfig) -> Self {
        Self { config }
    }

    /// Validate a raw top-level request into a typed [`Request`].
    ///
    /// Signal envelopes are validated independently of each other; the first
    /// invalid one fails the whole request with `InvalidSignal` carrying its
    /// index (fail-closed policy, no drop-and-continue).
    pub fn validate_request(&self, raw: &Value) -> Result<Request, GateFailure> {
        let map = raw
            .as_object()
            .ok_or_else(|| GateFailure::new(ReasonCode::TypeMismatch, "request is not an object"))?;

        for key in map.keys() {
            if !REQUEST_KEYS.contains(&key.as_str()) {
                return Err(GateFailure::new(ReasonCode::UnknownField, key.clone()));
            }
        }
        for key in REQUEST_REQUIRED_KEYS {
            if !map.contains_key(*key) {
                return Err(GateFailure::new(ReasonCode::MissingField, *key));
            }
        }

        // Wrong type on the version field is a version failure, not a generic
        // type failure: callers gate on this code to detect stale producers.
        let contract_version = require_u64(map, "contract_version")
            .map_err(|f| GateFailure::new(ReasonCode::BadVersion, f.detail))?;

        let component = require_nonempty_str(map, "component")?;
        let request_id = require_str(map, "request_id")?;

        let raw_signals = map
            .get("signals")
            .and_then(Value::as_array)
            .ok_or_else(|| GateFailure::new(ReasonCode::TypeMismatch, "signals"))?;

        let constraints = match map.get("constraints") {
            None => None,
            Some(Value::Object(_)) => Some(map["constraints"].clone()),
            Some(_) => return Err(GateFailure::new(ReasonCode::TypeMismatch, "constraints")),
        };

        let mut signals = Vec::with_capacity(raw_signals.len());
        for (index, raw_signal) in raw_signals.iter().enumerate() {
            signals.push(self.validate_signal(raw_signal, index)?);
        }

        Ok(Request {
            contract_version,
            component,
            request_id,
            signals,
            constraints,
        })
    }

    /// Validate a single raw signal envelope.
    ///
    /// Any schema failure inside the envelope is wrapped as `InvalidSignal`
    /// with the underlying code in the detail and the signal index attached.
    pub fn validate_signal(
        &self,
        raw: &Value,
        index: usize,
    ) -> Result<SignalEnvelope, GateFailure> {
        self.signal_schema(raw).map_err(|inner| {
            GateFailure::new(
                ReasonCode::InvalidSignal,
                format!("{}: {}", inner.code, inner.detail),
            )
            .at_signal(index)
        })
    }

    fn signal_schema(&self, raw: &Value) -> Result<SignalEnvelope, GateFailure> {
        let map = raw
            .as_object()
            .ok_or_else(|| GateFailure::new(ReasonCode::TypeMismatch, "signal is not an object"))?;

        for key in map.keys() {
            if !SIGNAL_KEYS.contains(&key.as_str()) {
                return Err(GateFailure::new(ReasonCode::UnknownField, key.clone()));
            }
        }
        for key in SIGNAL_KEYS {
            if !map.contains_key(*key) {
                return Err(GateFailure::new(ReasonCode::MissingField, *key));
            }
        }

        let contract_version = require_u64(map, "contract_version")
            .map_err(|f| GateFailure::new(ReasonCode::BadVersion, f.detail))?;
        if contract_version != self.config.supported_version {
            return Err(GateFailure::new(ReasonCode::BadVersion, "contract_version"));
        }

        let component = require_nonempty_str(map, "component")?;
        let request_id = require_nonempty_str(map, "request_id")?;
        let context_hash = require_nonempty_str(map, "context_hash")?;

        let decision_str = require_str(map, "decision")?;
        let decision = decision_str
            .parse::<Decision>()
            .map_err(|_| GateFailure::new(ReasonCode::TypeMismatch, "decision"))?;

        let risk = self.validate_risk(&map["risk"])?;
        let reason_codes = self.validate_reason_codes(&map["reason_codes"])?;

        let evidence = require_object(map, "evidence")?;
        let meta = require_object(map, "meta")?;

        Ok(SignalEnvelope {
            contract_version,
            component,
            request_id,
            context_hash,
            decision,
            risk,
            reason_codes,
            evidence,
            meta,
        })
    }

    fn validate_risk(&self, raw: &Value) -> Result<f64, GateFailure> {
        if !matches!(raw, Value::Number(_)) {
            return Err(GateFailure::new(ReasonCode::TypeMismatch, "risk"));
        }
        let risk = numeric::finite_f64(raw)
            .ok_or_else(|| GateFailure::new(ReasonCode::BadNumber, "risk"))?;
        if !(0.0..=1.0).contains(&risk) {
            return Err(GateFailure::new(ReasonCode::BadNumber, "risk out of range"));
        }
        Ok(risk)
    }

    fn validate_reason_codes(&self, raw: &Value) -> Result<Vec<String>, GateFailure> {
        let items = raw
            .as_array()
            .ok_or_else(|| GateFailure::new(ReasonCode::TypeMismatch, "reason_codes"))?;

        if items.len() > self.config.max_reason_codes {
            return Err(GateFailure::new(ReasonCode::TooLarge, "reason_codes"));
        }

        let mut codes = Vec::with_capacity(items.len());
        for item in items {
            // Unknown codes pass through opaquely (upstream vocabulary), but
            // they must be well-typed, non-empty, bounded strings.
            let code = item
                .as_str()
                .ok_or_else(|| GateFailure::new(ReasonCode::TypeMismatch, "reason_codes"))?;
            if code.is_empty() {
                return Err(GateFailure::new(ReasonCode::TypeMismatch, "reason_codes"));
            }
            if code.len() > self.config.max_reason_code_len {
                return Err(GateFailure::new(ReasonCode::TooLarge, "reason_codes"));
            }
            codes.push(code.to_string());
        }
        Ok(codes)
    }
}

fn require_u64(map: &serde_json::Map<String, Value>, key: &str) -> Result<u64, GateFailure> {
    match map.get(key) {
        // Value::Bool never reaches as_u64; the boolean/integer trap is
        // structurally impossible here, and tested anyway.
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| GateFailure::new(ReasonCode::TypeMismatch, key)),
        _ => Err(GateFailure::new(ReasonCode::TypeMismatch, key)),
    }
}

fn require_str(map: &serde_json::Map<String, Value>, key: &str) -> Result<String, GateFailure> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| GateFailure::new(ReasonCode::TypeMismatch, key))
}

fn require_nonempty_str(
    map: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<String, GateFailure> {
    let s = require_str(map, key)?;
    if s.is_empty() {
        return Err(GateFailure::new(ReasonCode::TypeMismatch, key));
    }
    Ok(s)
}

fn require_object(map: &serde_json::Map<String, Value>, key: &str) -> Result<Value, GateFailure> {
    match map.get(key) {
        Some(value @ Value::Object(_)) => Ok(value.clone()),
        _ => Err(GateFailure::new(ReasonCode::TypeMismatch, key)),
    }
}
