//! Per-invocation round context handed to processors.

use std::path::Path;

use aptgen_spec::{GeneratedArtifact, ProcessorOptions, SourceVersion};

/// Everything a processor may see or do during one handler invocation.
///
/// A fresh context is created for every invocation and dropped when the
/// handler returns; artifacts emitted through it are buffered by the driver
/// and only reach disk once every handler in the round has succeeded.
pub struct RoundContext<'a> {
    round: u32,
    processor: &'a str,
    source_version: SourceVersion,
    options: &'a ProcessorOptions,
    generated_dir: &'a Path,
    artifacts: Vec<GeneratedArtifact>,
    warnings: Vec<String>,
}

impl<'a> RoundContext<'a> {
    /// Creates a context for one handler invocation.
    pub fn new(
        round: u32,
        processor: &'a str,
        source_version: SourceVersion,
        options: &'a ProcessorOptions,
        generated_dir: &'a Path,
    ) -> Self {
        Self {
            round,
            processor,
            source_version,
            options,
            generated_dir,
            artifacts: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Round number, starting at 1.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Name of the processor being invoked.
    pub fn processor(&self) -> &str {
        self.processor
    }

    /// Source version of the compilation.
    pub fn source_version(&self) -> SourceVersion {
        self.source_version
    }

    /// All processor options.
    pub fn options(&self) -> &ProcessorOptions {
        self.options
    }

    /// Looks up a single option.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key)
    }

    /// Directory generated sources are flushed to.
    pub fn generated_dir(&self) -> &Path {
        self.generated_dir
    }

    /// Requests an artifact.
    pub fn emit(&mut self, artifact: GeneratedArtifact) {
        tracing::debug!(
            processor = self.processor,
            round = self.round,
            "requested {}",
            artifact.relative_path()
        );
        self.artifacts.push(artifact);
    }

    /// Artifacts requested so far.
    pub fn artifacts(&self) -> &[GeneratedArtifact] {
        &self.artifacts
    }

    /// Logs an informational message.
    pub fn note(&self, message: impl AsRef<str>) {
        tracing::info!(processor = self.processor, "{}", message.as_ref());
    }

    /// Logs a warning and records it for the report.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(processor = self.processor, "{}", message);
        self.warnings.push(message);
    }

    pub(crate) fn into_parts(self) -> (Vec<GeneratedArtifact>, Vec<String>) {
        (self.artifacts, self.warnings)
    }
}
