//! Report types for generation and validation runs.
//!
//! A [`Report`] documents one invocation: the manifest it read, each round
//! that ran (with per-processor statistics and written files), and any errors
//! or warnings raised along the way.

mod builder;


pub use builder::ReportBuilder;

use serde::{Deserialize, Serialize};

use crate::artifact::WrittenArtifact;
use crate::error::{ValidationError, ValidationWarning};

/// Report schema version.
pub const REPORT_VERSION: u32 = 1;

/// A complete report for a generate or validate invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (always 1).
    pub report_version: u32,
    /// BLAKE3 hash of the canonical element manifest.
    pub manifest_hash: String,
    /// BLAKE3 hash of the manifest file bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
    /// Source version the rounds ran with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_version: Option<String>,
    /// Whether the operation succeeded without errors.
    pub ok: bool,
    /// Errors that occurred.
    pub errors: Vec<ReportError>,
    /// Warnings that occurred.
    pub warnings: Vec<ReportWarning>,
    /// Rounds that completed.
    #[serde(default)]
    pub rounds: Vec<RoundSummary>,
    /// Combined hash of every written artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_hash: Option<String>,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
    /// Driver identifier and version.
    pub driver_version: String,
}

impl Report {
    /// Returns a builder.
    pub fn builder(manifest_hash: String, driver_version: String) -> ReportBuilder {
        ReportBuilder::new(manifest_hash, driver_version)
    }

    /// Iterates every written artifact across all rounds.
    pub fn outputs(&self) -> impl Iterator<Item = &WrittenArtifact> {
        self.rounds.iter().flat_map(|r| r.outputs.iter())
    }

    /// Serializes the report to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a report from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Summary of one completed round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Round number, starting at 1.
    pub round: u32,
    /// Number of elements presented.
    pub elements: usize,
    /// Per-processor statistics in registration order.
    pub processors: Vec<ProcessorStats>,
    /// Files written by this round.
    pub outputs: Vec<WrittenArtifact>,
    /// Round duration in milliseconds.
    pub duration_ms: u64,
}

/// Statistics for one processor within one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorStats {
    /// Processor name.
    pub name: String,
    /// Elements that matched the processor's capability.
    pub matched_elements: usize,
    /// Artifacts the processor requested.
    pub artifacts: usize,
    /// Whether the handler was invoked (it is skipped when nothing matched).
    pub invoked: bool,
    /// Time spent in the handler, in microseconds.
    pub duration_us: u64,
}

/// An error entry in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportError {
    /// Error code (e.g., "E010").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// JSON path or artifact path related to the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ReportError {
    /// Creates a new report error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new report error with a path.
    pub fn with_path(
        code: impl Into<String>,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Converts a validation error.
    pub fn from_validation_error(error: &ValidationError) -> Self {
        Self {
            code: error.code.to_string(),
            message: error.message.clone(),
            path: error.path.clone(),
        }
    }
}

/// A warning entry in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWarning {
    /// Warning code (e.g., "W004").
    pub code: String,
    /// Human-readable warning message.
    pub message: String,
    /// JSON path related to the warning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ReportWarning {
    /// Creates a new report warning.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    /// Converts a validation warning.
    pub fn from_validation_warning(warning: &ValidationWarning) -> Self {
        Self {
            code: warning.code.to_string(),
            message: warning.message.clone(),
            path: warning.path.clone(),
        }
    }
}
