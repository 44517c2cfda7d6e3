//! Error types for manifest validation and round processing.

use thiserror::Error;

/// Stable error codes reported by validation and by the generation driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Manifest errors (E001-E005)
    /// E001: Unsupported manifest_version
    UnsupportedManifestVersion,
    /// E002: Element name is not a valid identifier
    InvalidIdentifier,
    /// E003: Package name is not a dotted identifier path
    InvalidPackage,
    /// E004: Annotation name is not a qualified type name
    InvalidAnnotationName,
    /// E005: Source version could not be parsed
    InvalidSourceVersion,

    // Configuration errors (E006-E009)
    /// E006: Generated-output directory option is absent
    MissingOutputDirectory,
    /// E007: Generated-output directory cannot be created or locked
    UnwritableOutputDirectory,
    /// E008: Two processors registered under the same name
    DuplicateProcessor,
    /// E009: Processor option is not of the form key=value
    MalformedOption,

    // Round errors (E010-E015)
    /// E010: Two artifacts target the same (package, file name)
    DuplicateArtifact,
    /// E011: Artifact path escapes the output directory
    UnsafeArtifactPath,
    /// E012: Artifact file name or package is invalid
    InvalidArtifactName,
    /// E013: A processor reported a failure
    HandlerFailed,
    /// E014: Session did not converge within the round limit
    RoundLimitExceeded,
    /// E015: Writing an artifact failed; the round was rolled back
    OutputWriteFailed,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::UnsupportedManifestVersion => "E001",
            ErrorCode::InvalidIdentifier => "E002",
            ErrorCode::InvalidPackage => "E003",
            ErrorCode::InvalidAnnotationName => "E004",
            ErrorCode::InvalidSourceVersion => "E005",
            ErrorCode::MissingOutputDirectory => "E006",
            ErrorCode::UnwritableOutputDirectory => "E007",
            ErrorCode::DuplicateProcessor => "E008",
            ErrorCode::MalformedOption => "E009",
            ErrorCode::DuplicateArtifact => "E010",
            ErrorCode::UnsafeArtifactPath => "E011",
            ErrorCode::InvalidArtifactName => "E012",
            ErrorCode::HandlerFailed => "E013",
            ErrorCode::RoundLimitExceeded => "E014",
            ErrorCode::OutputWriteFailed => "E015",
        }
    }

    /// Returns true for errors that belong to the configuration category.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ErrorCode::MissingOutputDirectory
                | ErrorCode::UnwritableOutputDirectory
                | ErrorCode::DuplicateProcessor
                | ErrorCode::MalformedOption
        )
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes for validation and round processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Manifest lists no elements
    EmptyManifest,
    /// W002: Element carries no annotations
    NoAnnotations,
    /// W003: Same qualified name and kind listed twice
    DuplicateElement,
    /// W004: Option is not declared by any registered processor
    UnrecognizedOption,
    /// W005: Source version is newer than any processor supports
    SourceVersionNotSupported,
    /// W006: Warning raised by a processor through its round context
    ProcessorWarning,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::EmptyManifest => "W001",
            WarningCode::NoAnnotations => "W002",
            WarningCode::DuplicateElement => "W003",
            WarningCode::UnrecognizedOption => "W004",
            WarningCode::SourceVersionNotSupported => "W005",
            WarningCode::ProcessorWarning => "W006",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// JSON path to the problematic field (e.g., "elements[0].name").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a JSON path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// JSON path to the problematic field.
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation warning with a JSON path.
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Top-level error type for manifest operations.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Manifest validation failed with one or more errors.
    #[error("manifest validation failed with {0} error(s)")]
    ValidationFailed(usize),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of manifest validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed (no errors).
    pub ok: bool,
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of validation warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
        self.ok = false;
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Converts to a Result, returning Err if there are errors.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        if self.ok {
            Ok(self.warnings)
        } else {
            Err(self.errors)
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}
