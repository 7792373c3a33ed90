//! Command definitions and execution for the signal gate CLI

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use super::output::{self, OutputFormat};
use super::ExitCode;
use crate::compat;
use crate::config::GateConfig;
use crate::engine::ContractEvaluator;
use crate::error::{GateError, Result};
use crate::handler::{create_router, HandlerState};
use crate::telemetry::{emit_gate_event, GateMetricsRegistry};

/// Signal gate command-line interface
#[derive(Parser, Debug)]
#[command(name = "signal-gate", version, about = "Deterministic fail-closed signal aggregation gate")]
pub struct GateCli {
    #[command(subcommand)]
    pub command: GateCommands,
}

#[derive(Subcommand, Debug)]
pub enum GateCommands {
    /// Evaluate a request file against the v3 contract
    Evaluate {
        /// Path to a JSON request file
        #[arg(short, long)]
        request: PathBuf,

        /// Treat the file as a legacy v2 batch and adapt it first
        #[arg(long, default_value_t = false)]
        legacy: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Serve the gate over HTTP
    Serve {
        /// Listen address
        #[arg(long, default_value = "127.0.0.1:8090")]
        addr: String,
    },
}

/// Evaluate a request file and print the response.
pub fn execute_evaluate(
    request_path: PathBuf,
    legacy: bool,
    format: OutputFormat,
) -> Result<ExitCode> {
    let content = std::fs::read_to_string(&request_path)
        .map_err(|e| GateError::file_error(format!("{}: {}", request_path.display(), e)))?;
    let mut raw: serde_json::Value = serde_json::from_str(&content)?;

    if legacy {
        raw = compat::adapt_request(&raw)?;
    }

    let evaluator = ContractEvaluator::new(GateConfig::default());
    let start = Instant::now();
    let response = evaluator.evaluate(&raw);
    emit_gate_event(&response, start.elapsed().as_millis() as u64);

    output::render(&response, format)?;
    Ok(ExitCode::from_decision(response.decision))
}

/// Serve the gate over HTTP until interrupted.
pub fn execute_serve(addr: String) -> Result<ExitCode> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| GateError::InternalError(format!("runtime: {}", e)))?;

    runtime.block_on(async {
        let metrics = GateMetricsRegistry::new()
            .map_err(|e| GateError::TelemetryError(e.to_string()))?;
        let state = HandlerState::new(ContractEvaluator::new(GateConfig::default()), metrics);
        let router = create_router(state);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| GateError::TransportError(format!("bind {}: {}", addr, e)))?;
        info!(addr = %addr, "signal gate listening");

        axum::serve(listener, router)
            .await
            .map_err(|e| GateError::TransportError(e.to_string()))
    })?;

    Ok(ExitCode::Allow)
}
