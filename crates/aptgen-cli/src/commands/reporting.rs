use anyhow::{Context, Result};
use aptgen_spec::Report;
use colored::Colorize;
use std::fs;

/// Version string recorded in reports.
pub(crate) fn driver_version() -> String {
    format!("aptgen v{}", env!("CARGO_PKG_VERSION"))
}

pub(crate) fn write_report(report: &Report, path: &str) -> Result<()> {
    let json = report.to_json_pretty().context("Failed to serialize report")?;
    fs::write(path, json).with_context(|| format!("Failed to write report to: {}", path))?;
    Ok(())
}

pub(crate) fn print_json(report: &Report) -> Result<()> {
    let json = report.to_json_pretty().context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

/// Prints a report's errors and warnings in human-readable form.
pub(crate) fn print_messages(report: &Report) {
    if !report.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for err in &report.errors {
            let path = err
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!("  {} [{}]{}: {}", "x".red(), err.code, path.dimmed(), err.message);
        }
    }
    if !report.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warn in &report.warnings {
            let path = warn
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "!".yellow(),
                warn.code,
                path.dimmed(),
                warn.message
            );
        }
    }
}
