//! Errors raised by the registry, the generation driver, and sessions.

use std::path::PathBuf;

use aptgen_spec::{ArtifactKey, ErrorCode, OptionsError, ReportError, RoundSummary};
use thiserror::Error;

/// A failure reported by a processor while inspecting elements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    /// Human-readable message.
    pub message: String,
    /// Qualified name of the element being processed, if any.
    pub element: Option<String>,
}

impl HandlerError {
    /// Creates a handler error not tied to a specific element.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            element: None,
        }
    }

    /// Creates a handler error for a specific element.
    pub fn at(element: &aptgen_spec::AnnotatedElement, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            element: Some(element.qualified_name()),
        }
    }
}

/// Configuration problems detected before or while a round runs.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// No generated-output directory was configured.
    #[error("generated-output directory is not configured (use --out or -A kapt.kotlin.generated=<dir>)")]
    MissingOutputDirectory,

    /// The output directory could not be created or locked.
    #[error("generated-output directory is not writable: {}: {source}", .path.display())]
    UnwritableOutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two processors were registered under one name.
    #[error("processor '{0}' is already registered")]
    DuplicateProcessor(String),

    /// A processor option could not be parsed.
    #[error(transparent)]
    MalformedOption(#[from] OptionsError),

    /// The marker annotation is not a qualified type name.
    #[error("invalid marker annotation '{0}': expected a qualified type name")]
    InvalidMarker(String),
}

impl ConfigurationError {
    /// Returns the stable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigurationError::MissingOutputDirectory => ErrorCode::MissingOutputDirectory,
            ConfigurationError::UnwritableOutputDirectory { .. } => {
                ErrorCode::UnwritableOutputDirectory
            }
            ConfigurationError::DuplicateProcessor(_) => ErrorCode::DuplicateProcessor,
            ConfigurationError::MalformedOption(_) => ErrorCode::MalformedOption,
            ConfigurationError::InvalidMarker(_) => ErrorCode::InvalidAnnotationName,
        }
    }
}

/// Errors that abort a round. A failed round writes no files.
#[derive(Debug, Error)]
pub enum RoundError {
    /// Output directory or option problems.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Two requests target the same (package, file name).
    #[error("duplicate artifact {key}: requested by {first} and {second}")]
    DuplicateArtifact {
        key: ArtifactKey,
        first: String,
        second: String,
    },

    /// A processor requested an artifact that cannot be written.
    #[error("processor '{processor}' requested an invalid artifact '{path}': {message}")]
    InvalidArtifact {
        processor: String,
        path: String,
        code: ErrorCode,
        message: String,
    },

    /// A processor failed.
    #[error("processor '{processor}' failed: {source}")]
    Handler {
        processor: String,
        #[source]
        source: HandlerError,
    },

    /// The session kept producing artifacts past the round limit.
    #[error("processing did not converge within {0} round(s)")]
    RoundLimitExceeded(u32),

    /// Writing an artifact failed; the round was rolled back.
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RoundError {
    /// Returns the stable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            RoundError::Configuration(e) => e.code(),
            RoundError::DuplicateArtifact { .. } => ErrorCode::DuplicateArtifact,
            RoundError::InvalidArtifact { code, .. } => *code,
            RoundError::Handler { .. } => ErrorCode::HandlerFailed,
            RoundError::RoundLimitExceeded(_) => ErrorCode::RoundLimitExceeded,
            RoundError::Io { .. } => ErrorCode::OutputWriteFailed,
        }
    }

    /// Converts the error into a report entry.
    pub fn to_report_error(&self) -> ReportError {
        match self {
            RoundError::DuplicateArtifact { key, .. } => {
                ReportError::with_path(self.code().code(), self.to_string(), key.relative_path())
            }
            RoundError::InvalidArtifact { path, .. } => {
                ReportError::with_path(self.code().code(), self.to_string(), path.clone())
            }
            RoundError::Handler { source, .. } => match source.element {
                Some(ref element) => {
                    ReportError::with_path(self.code().code(), self.to_string(), element.clone())
                }
                None => ReportError::new(self.code().code(), self.to_string()),
            },
            _ => ReportError::new(self.code().code(), self.to_string()),
        }
    }
}

/// A session failure: the failing round's error plus the rounds that
/// completed before it.
#[derive(Debug, Error)]
#[error("round {round} failed: {error}")]
pub struct SessionError {
    /// Round number that failed.
    pub round: u32,
    /// The underlying round error.
    #[source]
    pub error: RoundError,
    /// Rounds that completed (and wrote their files) before the failure.
    pub completed: Vec<RoundSummary>,
}
