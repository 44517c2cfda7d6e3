//! Validate command implementation
//!
//! Checks an element manifest without running any processor.

use anyhow::{Context, Result};
use aptgen_spec::{canonical_manifest_hash, validate_manifest, Report, ReportBuilder};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use super::{reporting, EXIT_INVALID};
use crate::input::{load_manifest, LoadResult};

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(manifest_path: &str, report_path: Option<&str>, json_output: bool) -> Result<ExitCode> {
    let report = check(Path::new(manifest_path))?;

    if let Some(path) = report_path {
        reporting::write_report(&report, path)?;
    }

    if json_output {
        reporting::print_json(&report)?;
    } else {
        println!("{} {}", "Validating:".cyan().bold(), manifest_path);
        if let Some(hash) = &report.source_hash {
            println!("{} {}", "Source:".dimmed(), &hash[..16]);
        }
        reporting::print_messages(&report);
        if report.ok {
            println!(
                "\n{} Manifest is valid ({}ms)",
                "SUCCESS".green().bold(),
                report.duration_ms
            );
        } else {
            println!(
                "\n{} Manifest has {} error(s) ({}ms)",
                "FAILED".red().bold(),
                report.errors.len(),
                report.duration_ms
            );
        }
    }

    if report.ok {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_INVALID))
    }
}

/// Loads and validates a manifest, returning the report.
pub fn check(manifest_path: &Path) -> Result<Report> {
    let start = Instant::now();

    let LoadResult {
        manifest,
        source_hash,
    } = load_manifest(manifest_path)
        .with_context(|| format!("Failed to load manifest: {}", manifest_path.display()))?;

    let manifest_hash = canonical_manifest_hash(&manifest).context("Failed to hash manifest")?;
    let validation = validate_manifest(&manifest);

    let mut builder = ReportBuilder::new(manifest_hash, reporting::driver_version())
        .source_hash(source_hash)
        .validation_errors(&validation.errors)
        .validation_warnings(&validation.warnings);
    if let Some(version) = &manifest.source_version {
        builder = builder.source_version(version.clone());
    }

    Ok(builder
        .duration_ms(start.elapsed().as_millis() as u64)
        .build())
}
