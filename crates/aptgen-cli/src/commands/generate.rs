//! Generate command implementation
//!
//! Loads an element manifest, runs a processing session with the built-in
//! processors, and reports what was written.

use anyhow::{Context, Result};
use aptgen_spec::{canonical_manifest_hash, validate_manifest, Report, ReportBuilder, ReportError};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use super::{reporting, EXIT_INVALID, EXIT_ROUND_FAILED};
use crate::config::DriverConfig;
use crate::input::{load_manifest, LoadResult};

/// Result of a generate invocation.
#[derive(Debug)]
pub struct GenerateOutcome {
    /// The session report.
    pub report: Report,
    /// Process exit status: 0, [`EXIT_INVALID`], or [`EXIT_ROUND_FAILED`].
    pub exit: u8,
}

/// Run the generate command
///
/// # Arguments
/// * `manifest_path` - Path to the element manifest (JSON)
/// * `config` - Driver configuration from the command line
/// * `report_path` - Where to write the JSON report, if anywhere
/// * `json_output` - Print the report as JSON instead of colored text
///
/// # Returns
/// Exit code: 0 on success, 1 for invalid input or configuration, 2 if a
/// round failed
pub fn run(
    manifest_path: &str,
    config: &DriverConfig,
    report_path: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    if !json_output {
        println!("{} {}", "Generating:".cyan().bold(), manifest_path);
    }

    let outcome = execute(Path::new(manifest_path), config)?;

    if let Some(path) = report_path {
        reporting::write_report(&outcome.report, path)?;
    }

    if json_output {
        reporting::print_json(&outcome.report)?;
    } else {
        print_human(&outcome.report, report_path);
    }

    Ok(ExitCode::from(outcome.exit))
}

/// Loads, validates, and processes a manifest without printing anything.
pub fn execute(manifest_path: &Path, config: &DriverConfig) -> Result<GenerateOutcome> {
    let start = Instant::now();

    let LoadResult {
        manifest,
        source_hash,
    } = load_manifest(manifest_path)
        .with_context(|| format!("Failed to load manifest: {}", manifest_path.display()))?;

    let manifest_hash =
        canonical_manifest_hash(&manifest).context("Failed to hash manifest")?;
    let validation = validate_manifest(&manifest);
    let source_version = config.resolve_source_version(&manifest);

    let builder = ReportBuilder::new(manifest_hash, reporting::driver_version())
        .source_hash(source_hash)
        .source_version(source_version.to_string())
        .validation_errors(&validation.errors)
        .validation_warnings(&validation.warnings);

    if !validation.is_ok() {
        tracing::debug!(errors = validation.errors.len(), "manifest is invalid");
        return Ok(finish(builder, start, EXIT_INVALID));
    }

    let mut session = match config.build_session() {
        Ok(session) => session,
        Err(e) => {
            let builder = builder.error(ReportError::new(e.code().code(), e.to_string()));
            return Ok(finish(builder, start, EXIT_INVALID));
        }
    };

    match session.run(manifest.elements, source_version) {
        Ok(outcome) => {
            let mut builder = builder.rounds(outcome.summaries()).ok(true);
            for warning in outcome.warnings {
                builder = builder.warning(warning);
            }
            Ok(finish(builder, start, 0))
        }
        Err(e) => {
            let exit = if e.error.code().is_configuration() {
                EXIT_INVALID
            } else {
                EXIT_ROUND_FAILED
            };
            let mut error = e.error.to_report_error();
            error.message = format!("round {}: {}", e.round, error.message);
            let builder = builder.rounds(e.completed.clone()).error(error);
            Ok(finish(builder, start, exit))
        }
    }
}

fn finish(builder: ReportBuilder, start: Instant, exit: u8) -> GenerateOutcome {
    let report = builder
        .duration_ms(start.elapsed().as_millis() as u64)
        .build();
    GenerateOutcome { report, exit }
}

fn print_human(report: &Report, report_path: Option<&str>) {
    if let Some(version) = &report.source_version {
        println!("{} {}", "Source version:".dimmed(), version);
    }

    for round in &report.rounds {
        println!(
            "{} {}: {} element(s), {} file(s) written",
            "Round".cyan(),
            round.round,
            round.elements,
            round.outputs.len()
        );
        for output in &round.outputs {
            println!(
                "  {} {} {}",
                "+".green(),
                output.path,
                format!("[{}]", output.processor).dimmed()
            );
        }
    }

    reporting::print_messages(report);

    if let Some(path) = report_path {
        println!("\n{} {}", "Report:".dimmed(), path);
    }

    let written = report.outputs().count();
    if report.ok {
        println!(
            "\n{} Generated {} file(s) in {} round(s) ({}ms)",
            "SUCCESS".green().bold(),
            written,
            report.rounds.len(),
            report.duration_ms
        );
    } else {
        println!(
            "\n{} {} error(s) ({}ms)",
            "FAILED".red().bold(),
            report.errors.len(),
            report.duration_ms
        );
    }
}
