//! Telemetry module for the signal gate
//!
//! Out-of-band observability only: Prometheus metrics and structured
//! [`GateEvent`](crate::contracts::GateEvent) log records. Nothing in this
//! module may feed back into a response — the response contract is
//! deterministic and carries no measured timing.

pub mod metrics;

pub use metrics::{GateMetrics, GateMetricsRegistry};

use thiserror::Error;
use tracing::info;

use crate::contracts::{GateEvent, Response};
use crate::engine::response_dedup_stats;

/// Telemetry errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),

    #[error("Failed to serialize event: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Build the gate event for a finished evaluation and write it to the
/// structured log. Every transport (HTTP handler, CLI) emits through here.
pub fn emit_gate_event(response: &Response, duration_ms: u64) -> GateEvent {
    let stats = response_dedup_stats(response);
    let event = GateEvent::from_response(
        response,
        stats.input_signals,
        stats.retained_signals,
        duration_ms,
    );
    match serde_json::to_string(&event) {
        Ok(json) => info!(target: "gate_event", event = %json, "gate event"),
        Err(err) => info!(target: "gate_event", error = %err, "gate event serialization failed"),
    }
    event
}
