//! Signal Gate
//!
//! A deterministic, fail-closed signal-aggregation gate. It accepts a bounded
//! batch of pre-validated signal envelopes from upstream components,
//! re-validates each one strictly against the versioned contract,
//! deduplicates by content fingerprint, aggregates the batch into a summary,
//! and emits a single versioned, hashed response. It never assigns risk,
//! never decides enforcement, and retains no state across requests beyond
//! process-wide configuration.
//!
//! ## Architecture
//!
//! A strict linear pipeline with early exit on the first fatal condition:
//!
//! 1. **Contracts** (`contracts/`): the versioned request/envelope/response
//!    shapes and the stable reason-code taxonomy.
//!
//! 2. **Engine** (`engine/`): the evaluator pipeline - version gate, shape
//!    gate, strict schema validation with numeric guards, dedup by context
//!    hash, severity-ordered aggregation, canonical hashing.
//!
//! 3. **Compat** (`compat`): legacy v2 batch adapter; translates shapes,
//!    bypasses nothing.
//!
//! 4. **Handler** (`handler/`): axum transport wiring. No contract logic.
//!
//! 5. **Telemetry** (`telemetry/`): Prometheus metrics and GateEvent log
//!    records. Strictly out-of-band; responses stay deterministic.
//!
//! 6. **CLI** (`cli/`): evaluate request files and serve the HTTP gate.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use signal_gate::{ContractEvaluator, Decision};
//!
//! let gate = ContractEvaluator::default();
//! let response = gate.evaluate(&json!({
//!     "contract_version": 3,
//!     "component": "signal-gate",
//!     "request_id": "example-1",
//!     "signals": [],
//! }));
//!
//! assert_eq!(response.decision, Decision::Allow);
//! assert!(!response.meta.fail_closed);
//! ```

// Core modules
pub mod cli;
pub mod compat;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod telemetry;

// Contracts module - located at ../contracts relative to src/
#[path = "../contracts/mod.rs"]
pub mod contracts;

// Re-export contract types for external use
pub use contracts::{
    Decision, GateEvent, GateFailure, ReasonCode, Request, Response, ResponseMeta, SignalEnvelope,
};

// Re-export the evaluator and its configuration
pub use config::GateConfig;
pub use engine::aggregate::{aggregate, merge, AggregationResult};
pub use engine::dedup::{dedup_signals, DedupStats};
pub use engine::ContractEvaluator;

// Re-export handler types for deployment
pub use handler::{create_router, HandlerState, HealthResponse, HealthStatus};

// Re-export telemetry types
pub use telemetry::{emit_gate_event, GateMetricsRegistry, TelemetryError};

// Re-export error types
pub use error::{GateError, Result};

// Re-export CLI types for command-line usage
pub use cli::{ExitCode, GateCli, GateCommands, OutputFormat};

/// Gate version (from Cargo.toml)
pub const GATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the CLI application
///
/// This is the main entry point for the CLI binary.
pub fn run_cli(cli: GateCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            match e {
                GateError::FileError(_) => ExitCode::FileError,
                _ if e.is_user_error() => ExitCode::InvalidInput,
                _ => ExitCode::InternalError,
            }
        }
    }
}
