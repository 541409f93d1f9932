//! Presentation of scan payloads.
//!
//! Renderers only read the three payload shapes: a [`ScanOutcome`] report,
//! the no-dependencies message, or an [`ErrorPayload`].

mod cli;
mod json;

pub use cli::print_cli_table;
pub use json::{print_error_json, print_json};

use crate::model::{ErrorPayload, ScanOutcome};
use anyhow::Result;

/// Output format for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON payload for programmatic use
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'table' or 'json'", s)),
        }
    }
}

pub fn print_outcome(outcome: &ScanOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_cli_table(outcome),
        OutputFormat::Json => print_json(outcome),
    }
}

pub fn print_error(payload: &ErrorPayload, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            eprintln!("Error: {}", payload.error);
            Ok(())
        }
        OutputFormat::Json => print_error_json(payload),
    }
}

/// Serializes the payload for file output. Always JSON.
pub fn format_outcome_to_string(outcome: &ScanOutcome) -> Result<String> {
    Ok(serde_json::to_string_pretty(outcome)?)
}
