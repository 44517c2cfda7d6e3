//! Processors command implementation
//!
//! Lists the built-in processors and the capabilities they declare.

use anyhow::{Context, Result};
use aptgen_spec::ProcessorCapability;
use colored::Colorize;
use std::process::ExitCode;

use crate::processors::register_builtins;
use crate::registry::ProcessorRegistry;

/// Run the processors command
pub fn run(marker: &str, json_output: bool) -> Result<ExitCode> {
    let capabilities = capabilities(marker)?;

    if json_output {
        let json = serde_json::to_string_pretty(&capabilities)
            .context("Failed to serialize capabilities")?;
        println!("{}", json);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Registered processors:".cyan().bold());
    for capability in &capabilities {
        println!(
            "\n  {} (source version {})",
            capability.name.bold(),
            capability.source_version
        );
        if let Some(description) = &capability.description {
            println!("    {}", description.dimmed());
        }
        for annotation in &capability.supported_annotations {
            println!("    @{}", annotation);
        }
        for option in &capability.supported_options {
            println!("    -A {}=...", option);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Capabilities of the built-in processors in registration order.
pub fn capabilities(marker: &str) -> Result<Vec<ProcessorCapability>> {
    let mut registry = ProcessorRegistry::new();
    register_builtins(&mut registry, marker)?;
    Ok(registry.capabilities().cloned().collect())
}
