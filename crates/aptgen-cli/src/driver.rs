//! Generation driver.
//!
//! Runs one round: presents each registered processor with the elements its
//! capability matches, collects the artifacts it requests, rejects invalid or
//! colliding requests, and flushes the rest to the output directory. A round
//! either writes every artifact or none.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use aptgen_spec::{
    validate_artifact, AnnotatedElement, ArtifactKey, GeneratedArtifact, ProcessorOptions,
    ProcessorStats, ReportWarning, RoundSummary, SourceVersion, WarningCode, WrittenArtifact,
    GENERATED_DIR_OPTION,
};

use crate::context::RoundContext;
use crate::error::{ConfigurationError, RoundError};
use crate::output::OutputDir;
use crate::registry::ProcessorRegistry;

/// Elements presented in one round.
#[derive(Debug, Clone)]
pub struct RoundInput {
    /// Round number, starting at 1.
    pub round: u32,
    /// Source version of the compilation.
    pub source_version: SourceVersion,
    /// Elements for this round.
    pub elements: Vec<AnnotatedElement>,
}

impl RoundInput {
    /// Creates the first round's input.
    pub fn first(elements: Vec<AnnotatedElement>) -> Self {
        Self {
            round: 1,
            source_version: SourceVersion::DEFAULT,
            elements,
        }
    }

    /// Sets the source version.
    pub fn with_source_version(mut self, version: SourceVersion) -> Self {
        self.source_version = version;
        self
    }
}

/// Result of a successful round.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    /// Round number.
    pub round: u32,
    /// Files written, ordered by (package, file name).
    pub written: Vec<WrittenArtifact>,
    /// Per-processor statistics in registration order.
    pub stats: Vec<ProcessorStats>,
    /// Warnings raised during the round.
    pub warnings: Vec<ReportWarning>,
    /// Absolute output directory the files were written under.
    pub output_dir: PathBuf,
    /// Number of elements presented.
    pub elements: usize,
    /// Round duration in milliseconds.
    pub duration_ms: u64,
}

impl RoundOutcome {
    /// True if the round wrote anything, meaning another round may be needed
    /// to process the newly generated sources.
    pub fn needs_another_round(&self) -> bool {
        !self.written.is_empty()
    }

    /// Absolute paths of the written files.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.written
            .iter()
            .map(|w| self.output_dir.join(&w.path))
            .collect()
    }

    /// Converts into a report summary.
    pub fn summary(&self) -> RoundSummary {
        RoundSummary {
            round: self.round,
            elements: self.elements,
            processors: self.stats.clone(),
            outputs: self.written.clone(),
            duration_ms: self.duration_ms,
        }
    }
}

/// Drives rounds against a fixed option set.
#[derive(Debug, Clone)]
pub struct GenerationDriver {
    options: ProcessorOptions,
}

impl GenerationDriver {
    /// Creates a driver; the output directory is read from
    /// [`GENERATED_DIR_OPTION`].
    pub fn new(options: ProcessorOptions) -> Self {
        Self { options }
    }

    /// Creates a driver writing to `dir` with no other options.
    pub fn with_output_dir(dir: impl AsRef<std::path::Path>) -> Self {
        let options = ProcessorOptions::new().with(
            GENERATED_DIR_OPTION,
            dir.as_ref().to_string_lossy().into_owned(),
        );
        Self::new(options)
    }

    /// Options handed to processors.
    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// Resolves the configured output directory.
    pub fn output_dir(&self) -> Result<PathBuf, ConfigurationError> {
        self.options
            .generated_dir()
            .map(PathBuf::from)
            .ok_or(ConfigurationError::MissingOutputDirectory)
    }

    /// Runs one round.
    ///
    /// Handlers run in registration order; a handler whose capability matches
    /// none of the elements is not invoked. On success the returned outcome
    /// lists every written file.
    pub fn run_round(
        &self,
        input: &RoundInput,
        registry: &mut ProcessorRegistry,
    ) -> Result<RoundOutcome, RoundError> {
        self.run_round_with_history(input, registry, &BTreeMap::new())
    }

    /// Runs one round, also rejecting artifacts that an earlier round of the
    /// same session already wrote. `history` maps each earlier key to a
    /// description of who wrote it.
    pub(crate) fn run_round_with_history(
        &self,
        input: &RoundInput,
        registry: &mut ProcessorRegistry,
        history: &BTreeMap<ArtifactKey, String>,
    ) -> Result<RoundOutcome, RoundError> {
        let start = Instant::now();
        let output_dir = self.output_dir()?;
        let mut warnings = Vec::new();

        if let Some(latest) = registry.latest_supported_version() {
            if input.source_version > latest {
                let message = format!(
                    "source version {} is newer than the latest version supported by any processor ({})",
                    input.source_version, latest
                );
                tracing::warn!("{}", message);
                warnings.push(ReportWarning::new(
                    WarningCode::SourceVersionNotSupported.code(),
                    message,
                ));
            }
        }

        tracing::info!(
            round = input.round,
            elements = input.elements.len(),
            processors = registry.len(),
            "starting round"
        );

        let mut requested: Vec<(String, GeneratedArtifact)> = Vec::new();
        let mut stats = Vec::with_capacity(registry.len());

        for entry in registry.entries_mut() {
            let name = entry.capability.name.clone();
            let matched: Vec<&AnnotatedElement> = input
                .elements
                .iter()
                .filter(|e| entry.capability.matches(e))
                .collect();

            if matched.is_empty() {
                tracing::debug!(processor = %name, "no matching elements; skipped");
                stats.push(ProcessorStats {
                    name,
                    matched_elements: 0,
                    artifacts: 0,
                    invoked: false,
                    duration_us: 0,
                });
                continue;
            }

            let handler_start = Instant::now();
            let mut ctx = RoundContext::new(
                input.round,
                &name,
                input.source_version,
                &self.options,
                &output_dir,
            );
            entry
                .handler
                .process(&matched, &mut ctx)
                .map_err(|source| RoundError::Handler {
                    processor: name.clone(),
                    source,
                })?;
            let (artifacts, messages) = ctx.into_parts();
            let duration_us = handler_start.elapsed().as_micros() as u64;

            tracing::debug!(
                processor = %name,
                matched = matched.len(),
                artifacts = artifacts.len(),
                "processor finished"
            );

            warnings.extend(messages.into_iter().map(|m| {
                ReportWarning::new(
                    WarningCode::ProcessorWarning.code(),
                    format!("[{}] {}", name, m),
                )
            }));
            stats.push(ProcessorStats {
                name: name.clone(),
                matched_elements: matched.len(),
                artifacts: artifacts.len(),
                invoked: true,
                duration_us,
            });
            requested.extend(artifacts.into_iter().map(|a| (name.clone(), a)));
        }

        check_requests(&requested, history)?;
        requested.sort_by_key(|(_, artifact)| artifact.key());

        let written = if requested.is_empty() {
            Vec::new()
        } else {
            let dir = OutputDir::acquire(&output_dir)?;
            dir.write_all(&requested)?
        };

        tracing::info!(
            round = input.round,
            written = written.len(),
            "round complete"
        );

        Ok(RoundOutcome {
            round: input.round,
            written,
            stats,
            warnings,
            output_dir,
            elements: input.elements.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Validates each request and rejects (package, file name) collisions.
fn check_requests(
    requested: &[(String, GeneratedArtifact)],
    history: &BTreeMap<ArtifactKey, String>,
) -> Result<(), RoundError> {
    let mut claimed: BTreeMap<ArtifactKey, &str> = BTreeMap::new();

    for (processor, artifact) in requested {
        if let Some(error) = validate_artifact(artifact).into_iter().next() {
            return Err(RoundError::InvalidArtifact {
                processor: processor.clone(),
                path: artifact.relative_path(),
                code: error.code,
                message: error.message,
            });
        }

        let key = artifact.key();
        if let Some(earlier) = history.get(&key) {
            return Err(RoundError::DuplicateArtifact {
                key,
                first: earlier.clone(),
                second: format!("'{}'", processor),
            });
        }
        if let Some(first) = claimed.insert(key.clone(), processor) {
            return Err(RoundError::DuplicateArtifact {
                key,
                first: format!("'{}'", first),
                second: format!("'{}'", processor),
            });
        }
    }

    Ok(())
}
