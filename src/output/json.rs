use crate::model::{ErrorPayload, ScanOutcome};
use anyhow::Result;

pub fn print_json(outcome: &ScanOutcome) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(outcome)?);
    Ok(())
}

pub fn print_error_json(payload: &ErrorPayload) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}
