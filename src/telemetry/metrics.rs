//! Prometheus metrics for the signal gate
//!
//! Metrics collected per evaluation:
//! - `gate_requests_total` (counter) - evaluations by response decision
//! - `gate_failures_total` (counter) - fail-closed responses by reason code
//! - `gate_signals_deduped_total` (counter) - duplicate signals collapsed
//! - `gate_duration_seconds` (histogram) - measured evaluation duration
//!
//! Duration lives here and only here; the response payload pins
//! `latency_ms` to 0 by contract.

use prometheus::{
    Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use super::Result;
use crate::contracts::Response;
use crate::engine::response_dedup_stats;

/// Gate metrics registered against a Prometheus registry.
pub struct GateMetrics {
    /// Evaluations by response decision.
    requests_total: CounterVec,
    /// Fail-closed responses by reason code.
    failures_total: CounterVec,
    /// Duplicate signals collapsed across all evaluations.
    signals_deduped_total: Counter,
    /// Evaluation duration distribution.
    duration_seconds: Histogram,
}

impl GateMetrics {
    /// Create and register the gate metrics.
    pub fn new(registry: &Registry) -> Result<Self> {
        let requests_total = CounterVec::new(
            Opts::new("gate_requests_total", "Total gate evaluations by decision"),
            &["decision"],
        )?;
        let failures_total = CounterVec::new(
            Opts::new(
                "gate_failures_total",
                "Total fail-closed responses by reason code",
            ),
            &["reason_code"],
        )?;
        let signals_deduped_total = Counter::new(
            "gate_signals_deduped_total",
            "Total duplicate signals collapsed",
        )?;
        let duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "gate_duration_seconds",
            "Gate evaluation duration in seconds",
        ))?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(failures_total.clone()))?;
        registry.register(Box::new(signals_deduped_total.clone()))?;
        registry.register(Box::new(duration_seconds.clone()))?;

        Ok(Self {
            requests_total,
            failures_total,
            signals_deduped_total,
            duration_seconds,
        })
    }

    /// Record one finished evaluation.
    pub fn record_response(&self, response: &Response, duration_secs: f64) {
        self.requests_total
            .with_label_values(&[response.decision.as_str()])
            .inc();

        if response.is_error() {
            if let Some(code) = response.reason_codes.first() {
                self.failures_total.with_label_values(&[code]).inc();
            }
        }

        let stats = response_dedup_stats(response);
        if stats.collapsed() > 0 {
            self.signals_deduped_total.inc_by(stats.collapsed() as f64);
        }

        self.duration_seconds.observe(duration_secs);
    }
}

/// Owns the registry and the gate metrics; shared across the handler.
#[derive(Clone)]
pub struct GateMetricsRegistry {
    registry: Arc<Registry>,
    gate: Arc<GateMetrics>,
}

impl GateMetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let gate = Arc::new(GateMetrics::new(&registry)?);
        Ok(Self { registry, gate })
    }

    pub fn gate(&self) -> &GateMetrics {
        &self.gate
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
