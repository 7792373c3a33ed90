//! Gate configuration
//!
//! Process-wide, immutable configuration for the contract evaluator: the
//! supported contract version, this gate's component identity, and the hard
//! limits enforced before any expensive work. Established once at process
//! start and never mutated; concurrent evaluations share it read-only.

use serde::{Deserialize, Serialize};

/// Immutable limits and identity for the gate.
///
/// The defaults are the contract's hard limits; callers may tighten them via
/// the builder methods but the evaluator never relaxes them at call time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// The single contract version this gate enforces.
    pub supported_version: u64,
    /// This gate's own component identity; requests must address it.
    pub component: String,
    /// Maximum signal envelopes per request.
    pub max_signals: usize,
    /// Maximum canonical-encoded request size in bytes.
    pub max_request_bytes: usize,
    /// Maximum nesting depth anywhere in the request.
    pub max_depth: usize,
    /// Maximum structural nodes visited while walking the request.
    pub max_nodes: usize,
    /// Maximum reason codes per signal envelope.
    pub max_reason_codes: usize,
    /// Maximum length of a single reason code string.
    pub max_reason_code_len: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            supported_version: 3,
            component: "signal-gate".to_string(),
            max_signals: 256,
            max_request_bytes: 500_000,
            max_depth: 32,
            max_nodes: 50_000,
            max_reason_codes: 64,
            max_reason_code_len: 96,
        }
    }
}

impl GateConfig {
    /// Set the component identity this gate answers to.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = component.into();
        self
    }

    /// Set the maximum signal count.
    pub fn with_max_signals(mut self, max_signals: usize) -> Self {
        self.max_signals = max_signals;
        self
    }

    /// Set the maximum canonical request size in bytes.
    pub fn with_max_request_bytes(mut self, max_request_bytes: usize) -> Self {
        self.max_request_bytes = max_request_bytes;
        self
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Deterministic fingerprint of the active limits.
    ///
    /// Folded into every response `context_hash` so that two responses are
    /// only byte-identical when they were produced under identical limits.
    pub fn fingerprint(&self) -> String {
        let value = serde_json::json!({
            "supported_version": self.supported_version,
            "component": self.component,
            "max_signals": self.max_signals,
            "max_request_bytes": self.max_request_bytes,
            "max_depth": self.max_depth,
            "max_nodes": self.max_nodes,
            "max_reason_codes": self.max_reason_codes,
            "max_reason_code_len": self.max_reason_code_len,
        });
        crate::engine::fingerprint::context_hash(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_contract_limits() {
        let config = GateConfig::default();
        assert_eq!(config.supported_version, 3);
        assert_eq!(config.max_signals, 256);
        assert_eq!(config.max_request_bytes, 500_000);
        assert_eq!(config.component, "signal-gate");
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = GateConfig::default();
        let b = GateConfig::default();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_tracks_limit_changes() {
        let a = GateConfig::default();
        let b = GateConfig::default().with_max_signals(128);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_builder_methods() {
        let config = GateConfig::default()
            .with_component("edge-gate")
            .with_max_depth(8);
        assert_eq!(config.component, "edge-gate");
        assert_eq!(config.max_depth, 8);
    }
}
