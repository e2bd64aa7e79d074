use anyhow::Result;
use serde::Serialize;
use std::io::Write;

/// Writes a report as JSON, one document per call.
pub fn export_json(report: &impl Serialize, pretty: bool, output: &mut dyn Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    writeln!(output, "{json}")?;
    Ok(())
}
