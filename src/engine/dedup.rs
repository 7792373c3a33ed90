//! Deduplicator: collapse signals sharing a context hash
//!
//! Two envelopes are duplicates iff their `context_hash` fields are
//! byte-equal. The first occurrence in input order is retained and later ones
//! dropped, so the output is a stable, order-preserving subsequence.
//!
//! The gate never re-derives an envelope's `context_hash`: it is the upstream
//! producer's fingerprint, used here only as a key. Because retained order is
//! input order, the determinism of anything hashed over this sequence is
//! conditional on the caller supplying a deterministic producer order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::contracts::SignalEnvelope;

/// Deduplication statistics, carried into the response evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupStats {
    /// Signals received in the request.
    pub input_signals: usize,
    /// Signals retained after collapsing duplicates.
    pub retained_signals: usize,
}

impl DedupStats {
    /// Number of duplicates dropped.
    pub fn collapsed(&self) -> usize {
        self.input_signals - self.retained_signals
    }
}

/// Collapse duplicate envelopes, keeping the first occurrence of each
/// `context_hash` in input order.
pub fn dedup_signals(signals: Vec<SignalEnvelope>) -> (Vec<SignalEnvelope>, DedupStats) {
    let input_signals = signals.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(input_signals);
    let mut retained = Vec::with_capacity(input_signals);

    for signal in signals {
        if seen.insert(signal.context_hash.clone()) {
            retained.push(signal);
        }
    }

    let stats = DedupStats {
        input_signals,
        retained_signals: retained.len(),
    };
    (retained, stats)
}
