//! Validate command implementation.

use std::fmt::Write as _;

use anyhow::Result;
use byteworld_core::{RegistryStats, Violations};
use byteworld_registry::validate;
use clap::Args;
use serde_json::json;
use tracing::info;

use super::RegistryArgs;

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Output format (text, json)
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for the validate command.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Runs the validate command.
///
/// Exits non-zero after printing every violation if the registry is invalid.
pub fn run(registry: &RegistryArgs, args: &ValidateArgs) -> Result<()> {
    let layout = registry.layout()?;
    info!(root = %registry.root.display(), "Validating registry");

    let outcome = validate(&layout).map(|index| index.stats());
    print!("{}", render(&outcome, args.format)?);

    match outcome {
        Ok(_) => Ok(()),
        Err(violations) => anyhow::bail!("{} violation(s) found", violations.len()),
    }
}

fn render(outcome: &Result<RegistryStats, Violations>, format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match (format, outcome) {
        (OutputFormat::Json, Ok(stats)) => {
            writeln!(out, "{}", serde_json::to_string_pretty(&json!({ "valid": true, "stats": stats }))?)?;
        }
        (OutputFormat::Json, Err(violations)) => {
            writeln!(
                out,
                "{}",
                serde_json::to_string_pretty(&json!({ "valid": false, "violations": violations }))?
            )?;
        }
        (OutputFormat::Text, Ok(stats)) => {
            writeln!(out, "✓ Registry is valid")?;
            writeln!(out, "  ASNs:          {}", stats.asns)?;
            writeln!(out, "  IPv4 prefixes: {}", stats.ipv4_prefixes)?;
            writeln!(out, "  IPv6 prefixes: {}", stats.ipv6_prefixes)?;
            for (category, count) in &stats.services {
                writeln!(out, "  {category} services: {count}")?;
            }
        }
        (OutputFormat::Text, Err(violations)) => {
            for violation in violations {
                writeln!(out, "✗ {violation}")?;
                if let Some(field) = &violation.field {
                    writeln!(out, "    field: {field}")?;
                }
                if let Some(other) = &violation.conflicting_file {
                    writeln!(out, "    conflicts with: {}", other.display())?;
                }
            }
            writeln!(out, "\n{} violation(s) found", violations.len())?;
        }
    }
    Ok(out)
}
