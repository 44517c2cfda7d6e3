//! Driver configuration assembled from command-line flags.

use std::path::PathBuf;

use aptgen_spec::{ElementManifest, ProcessorOptions, SourceVersion, GENERATED_DIR_OPTION};

use crate::driver::GenerationDriver;
use crate::error::ConfigurationError;
use crate::processors::{self, DEFAULT_MARKER};
use crate::registry::ProcessorRegistry;
use crate::session::{Session, DEFAULT_MAX_ROUNDS};

/// Settings for one `generate` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Output directory; overrides `-A kapt.kotlin.generated=...`.
    pub out_dir: Option<PathBuf>,
    /// Raw `key=value` processor options.
    pub options: Vec<String>,
    /// Annotation observed by the kaptgen processor.
    pub marker: String,
    /// Round limit.
    pub max_rounds: u32,
    /// Empty the output directory before the first round.
    pub clean: bool,
    /// Source version; overrides the manifest's.
    pub source_version: Option<SourceVersion>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            out_dir: None,
            options: Vec::new(),
            marker: DEFAULT_MARKER.to_string(),
            max_rounds: DEFAULT_MAX_ROUNDS,
            clean: false,
            source_version: None,
        }
    }
}

impl DriverConfig {
    /// Parses the `-A` options and applies `out_dir`.
    pub fn processor_options(&self) -> Result<ProcessorOptions, ConfigurationError> {
        let mut options = ProcessorOptions::parse(&self.options)?;
        if let Some(dir) = &self.out_dir {
            options.set(GENERATED_DIR_OPTION, dir.to_string_lossy());
        }
        Ok(options)
    }

    /// Source version for the session: the flag, else the manifest's, else
    /// the default. An unparseable manifest value is reported by validation.
    pub fn resolve_source_version(&self, manifest: &ElementManifest) -> SourceVersion {
        self.source_version
            .or_else(|| {
                manifest
                    .source_version
                    .as_deref()
                    .and_then(|v| v.parse().ok())
            })
            .unwrap_or_default()
    }

    /// Builds a session with the built-in processors registered.
    pub fn build_session(&self) -> Result<Session, ConfigurationError> {
        let mut registry = ProcessorRegistry::new();
        processors::register_builtins(&mut registry, &self.marker)?;

        let driver = GenerationDriver::new(self.processor_options()?);
        Ok(Session::new(driver, registry)
            .max_rounds(self.max_rounds)
            .clean(self.clean))
    }
}
