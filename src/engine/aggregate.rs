//! Aggregator: fold the deduplicated signal sequence into a summary
//!
//! A single linear fold producing decision counts, per-component counts, the
//! distinct upstream reason codes in first-seen order, and the rollup
//! decision by fixed severity (`BLOCK > ERROR > WARN > ALLOW`). An empty
//! sequence rolls up to `ALLOW`: no signals, nothing to report.
//!
//! The fold is mergeable: aggregating two sub-batches and merging the partial
//! results equals aggregating the whole sequence at once. [`merge`] is the
//! rule a parallel fold-then-merge implementation would have to use, and the
//! property suite holds the linear fold to it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::dedup::DedupStats;
use crate::contracts::{Decision, ReasonCode, SignalEnvelope};

/// The fold of a deduplicated, ordered signal sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Count per decision value, only for decisions actually observed.
    /// BTreeMap keeps the serialized form canonically ordered.
    pub counts_by_decision: BTreeMap<String, u64>,
    /// Count per upstream component.
    pub counts_by_component: BTreeMap<String, u64>,
    /// Distinct upstream reason codes in first-seen order.
    pub reason_codes: Vec<String>,
    /// Rollup decision: most severe decision present, `ALLOW` when empty.
    pub decision: Decision,
    /// Dedup statistics for the batch this fold consumed.
    pub dedup: DedupStats,
}

impl AggregationResult {
    /// The rollup reason code announcing this result.
    pub fn rollup_code(&self) -> ReasonCode {
        match self.decision {
            Decision::Allow => ReasonCode::OkAllow,
            Decision::Warn => ReasonCode::EscalateWarn,
            Decision::Error => ReasonCode::DenyError,
            Decision::Block => ReasonCode::DenyBlock,
        }
    }
}

/// Fold a deduplicated signal sequence into an [`AggregationResult`].
pub fn aggregate(signals: &[SignalEnvelope], dedup: DedupStats) -> AggregationResult {
    let mut counts_by_decision: BTreeMap<String, u64> = BTreeMap::new();
    let mut counts_by_component: BTreeMap<String, u64> = BTreeMap::new();
    let mut reason_codes: Vec<String> = Vec::new();
    let mut decision = Decision::Allow;

    for signal in signals {
        *counts_by_decision
            .entry(signal.decision.as_str().to_string())
            .or_insert(0) += 1;
        *counts_by_component
            .entry(signal.component.clone())
            .or_insert(0) += 1;

        for code in &signal.reason_codes {
            if !reason_codes.iter().any(|c| c == code) {
                reason_codes.push(code.clone());
            }
        }

        decision = decision.max_severity(signal.decision);
    }

    AggregationResult {
        counts_by_decision,
        counts_by_component,
        reason_codes,
        decision,
        dedup,
    }
}

/// Merge two partial aggregation results, left batch before right.
///
/// Counts add, reason codes union with the left side's first-seen order
/// taking precedence, severity dominates, and dedup statistics add.
pub fn merge(left: AggregationResult, right: AggregationResult) -> AggregationResult {
    let mut counts_by_decision = left.counts_by_decision;
    for (key, count) in right.counts_by_decision {
        *counts_by_decision.entry(key).or_insert(0) += count;
    }

    let mut counts_by_component = left.counts_by_component;
    for (key, count) in right.counts_by_component {
        *counts_by_component.entry(key).or_insert(0) += count;
    }

    let mut reason_codes = left.reason_codes;
    for code in right.reason_codes {
        if !reason_codes.iter().any(|c| *c == code) {
            reason_codes.push(code);
        }
    }

    AggregationResult {
        counts_by_decision,
        counts_by_component,
        reason_codes,
        decision: left.decision.max_severity(right.decision),
        dedup: DedupStats {
            input_signals: left.dedup.input_signals + right.dedup.input_signals,
            retained_signals: left.dedup.retained_signals + right.dedup.retained_signals,
        },
    }
}
