//! CLI module for the signal gate
//!
//! Provides command-line access to the contract evaluator: evaluating a
//! request file (native v3 or legacy v2 shape) and serving the HTTP gate.

pub mod commands;
pub mod output;

pub use commands::{GateCli, GateCommands};
pub use output::OutputFormat;

use crate::error::GateError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Evaluation completed, decision ALLOW
    Allow = 0,
    /// Evaluation completed, decision BLOCK
    Block = 1,
    /// Evaluation completed, decision WARN
    Warn = 2,
    /// Evaluation completed, decision ERROR (fail-closed)
    ContractError = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Invalid input or arguments
    InvalidInput = 5,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Map a response decision to the exit code callers script against.
    pub fn from_decision(decision: crate::contracts::Decision) -> Self {
        use crate::contracts::Decision;
        match decision {
            Decision::Allow => ExitCode::Allow,
            Decision::Warn => ExitCode::Warn,
            Decision::Block => ExitCode::Block,
            Decision::Error => ExitCode::ContractError,
        }
    }
}

/// Run the CLI with the given arguments and return the exit code
pub fn run(cli: GateCli) -> Result<ExitCode, GateError> {
    match cli.command {
        GateCommands::Evaluate {
            request,
            legacy,
            format,
        } => commands::execute_evaluate(request, legacy, format),
        GateCommands::Serve { addr } => commands::execute_serve(addr),
    }
}
