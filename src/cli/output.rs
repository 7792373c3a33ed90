//! Output formatting for the signal gate CLI
//!
//! Renders contract responses either as machine-readable JSON or as a short
//! colored text summary for interactive use.

use clap::ValueEnum;
use colored::Colorize;
use std::io::{self, Write};

use crate::contracts::{Decision, Response};
use crate::error::Result;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable summary with colors
    #[default]
    Text,
    /// JSON format for machine processing
    Json,
}

/// Render a response to stdout in the requested format.
pub fn render(response: &Response, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(response)?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Text => {
            writeln!(out, "{}", render_text(response))?;
        }
    }
    Ok(())
}

fn render_text(response: &Response) -> String {
    let decision = colorize_decision(response.decision);
    let mut lines = vec![
        format!("decision:     {}", decision),
        format!("request_id:   {}", response.request_id),
        format!("context_hash: {}", response.context_hash),
        format!("reason_codes: {}", response.reason_codes.join(", ")),
    ];
    if response.meta.fail_closed {
        lines.push(format!("{}", "fail-closed".red().bold()));
    }
    lines.join("\n")
}

fn colorize_decision(decision: Decision) -> String {
    let s = decision.as_str();
    match decision {
        Decision::Allow => s.green().to_string(),
        Decision::Warn => s.yellow().to_string(),
        Decision::Block => s.red().bold().to_string(),
        Decision::Error => s.red().to_string(),
    }
}
