//! Stable reason codes for the signal gate contract
//!
//! Reason codes are contract-level identifiers. Downstream orchestrators and
//! tests key on these codes, never on free-form messages. Codes are append-only:
//! a code that has shipped keeps its string forever.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable reason codes emitted in gate responses.
///
/// Rollup codes (`OkAllow`, `EscalateWarn`, `DenyBlock`, `DenyError`) describe
/// the aggregation outcome of a valid request. Error codes describe why a
/// request was rejected; every error code implies `decision = ERROR` and
/// `meta.fail_closed = true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonCode {
    // --- Rollup outcomes ---
    /// All retained signals are ALLOW (or the batch is empty).
    OkAllow,
    /// At least one WARN and nothing more severe.
    EscalateWarn,
    /// At least one BLOCK present.
    DenyBlock,
    /// At least one upstream ERROR present, no BLOCK.
    DenyError,

    // --- Request validation failures (fail-closed) ---
    /// `contract_version` absent, wrong type, or not the supported value.
    BadVersion,
    /// The `component` field does not name this gate.
    ComponentMismatch,
    /// A key outside the strict allowlist.
    UnknownField,
    /// A required key is absent.
    MissingField,
    /// A key is present but its value has the wrong type.
    TypeMismatch,
    /// A non-finite or out-of-range numeric value anywhere in the structure.
    BadNumber,
    /// Payload size, signal count, nesting depth, or node count over limit.
    TooLarge,
    /// A nested signal envelope failed its own schema.
    InvalidSignal,
    /// Unexpected pipeline failure; never used for classifiable conditions.
    Internal,
}

impl ReasonCode {
    /// The wire string for this code.
    pub fn as_str(self) -> &'static str {
        match self {
            ReasonCode::OkAllow => "SGATE_OK_ALLOW",
            ReasonCode::EscalateWarn => "SGATE_ESCALATE_WARN",
            ReasonCode::DenyBlock => "SGATE_DENY_BLOCK",
            ReasonCode::DenyError => "SGATE_DENY_ERROR",
            ReasonCode::BadVersion => "SGATE_ERROR_BAD_VERSION",
            ReasonCode::ComponentMismatch => "SGATE_ERROR_COMPONENT_MISMATCH",
            ReasonCode::UnknownField => "SGATE_ERROR_UNKNOWN_FIELD",
            ReasonCode::MissingField => "SGATE_ERROR_MISSING_FIELD",
            ReasonCode::TypeMismatch => "SGATE_ERROR_TYPE_MISMATCH",
            ReasonCode::BadNumber => "SGATE_ERROR_BAD_NUMBER",
            ReasonCode::TooLarge => "SGATE_ERROR_TOO_LARGE",
            ReasonCode::InvalidSignal => "SGATE_ERROR_INVALID_SIGNAL",
            ReasonCode::Internal => "SGATE_ERROR_INTERNAL",
        }
    }

    /// Whether this code reports a validation failure (vs a rollup outcome).
    pub fn is_error(self) -> bool {
        !matches!(
            self,
            ReasonCode::OkAllow
                | ReasonCode::EscalateWarn
                | ReasonCode::DenyBlock
                | ReasonCode::DenyError
        )
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified gate failure: the reason code plus the context needed to
/// report it without re-running validation.
///
/// This is not a Rust error type on purpose: contract failures are part of the
/// response contract (`decision = ERROR`), not exceptional control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateFailure {
    /// The stable code for the failing gate.
    pub code: ReasonCode,
    /// Short machine-oriented detail (field name, limit name). Not interpreted.
    pub detail: String,
    /// Index of the offending signal, when the failure is signal-scoped.
    pub signal_index: Option<usize>,
}

impl GateFailure {
    pub fn new(code: ReasonCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
            signal_index: None,
        }
    }

    /// Wrap a failure with the index of the signal it occurred in.
    pub fn at_signal(mut self, index: usize) -> Self {
        self.signal_index = Some(index);
        self
    }
}

impl fmt::Display for GateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.signal_index {
            Some(i) => write!(f, "{} at signal {}: {}", self.code, i, self.detail),
            None => write!(f, "{}: {}", self.code, self.detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable_strings() {
        assert_eq!(ReasonCode::BadVersion.as_str(), "SGATE_ERROR_BAD_VERSION");
        assert_eq!(ReasonCode::OkAllow.as_str(), "SGATE_OK_ALLOW");
        assert_eq!(ReasonCode::TooLarge.to_string(), "SGATE_ERROR_TOO_LARGE");
    }

    #[test]
    fn test_error_classification() {
        assert!(ReasonCode::BadNumber.is_error());
        assert!(ReasonCode::Internal.is_error());
        assert!(!ReasonCode::OkAllow.is_error());
        assert!(!ReasonCode::DenyError.is_error());
    }

    #[test]
    fn test_failure_display_carries_signal_index() {
        let failure = GateFailure::new(ReasonCode::BadNumber, "risk").at_signal(4);
        assert_eq!(
            failure.to_string(),
            "SGATE_ERROR_BAD_NUMBER at signal 4: risk"
        );
    }
}
