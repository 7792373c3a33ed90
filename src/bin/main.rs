//! Signal Gate CLI
//!
//! Command-line interface for the signal gate.
//!
//! # Usage
//!
//! ```bash
//! # Evaluate a v3 request file
//! signal-gate evaluate --request request.json --format json
//!
//! # Evaluate a legacy v2 batch
//! signal-gate evaluate --request batch.json --legacy
//!
//! # Serve the gate over HTTP
//! signal-gate serve --addr 0.0.0.0:8090
//! ```
//!
//! # Exit Codes
//!
//! - 0: Decision ALLOW
//! - 1: Decision BLOCK
//! - 2: Decision WARN
//! - 3: Decision ERROR (fail-closed)
//! - 4: File not found or inaccessible
//! - 5: Invalid input or arguments
//! - 10: Internal error

use clap::Parser;
use signal_gate::{run_cli, GateCli};

fn main() {
    // WARN by default; RUST_LOG overrides (gate_event records go to info).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let exit_code = run_cli(GateCli::parse());
    std::process::exit(exit_code.into());
}
