//! Artifact path safety validation.

use crate::artifact::GeneratedArtifact;
use crate::error::{ErrorCode, ValidationError};

use super::{is_valid_package, is_valid_identifier};

/// Checks if a relative artifact path stays inside the output root.
pub fn is_safe_artifact_path(path: &str) -> bool {
    artifact_path_safety_errors(path).is_empty()
}

/// Validates the package, file name, and resulting path of an artifact.
///
/// Returns every problem found; an empty vector means the artifact can be
/// written.
pub fn validate_artifact(artifact: &GeneratedArtifact) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !is_valid_package(&artifact.package) {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidArtifactName,
            format!("artifact package is not a dotted identifier path: '{}'", artifact.package),
            "package",
        ));
    }

    let file_name = &artifact.file_name;
    if file_name.contains('/') || file_name.contains('\\') {
        errors.push(ValidationError::with_path(
            ErrorCode::UnsafeArtifactPath,
            format!("artifact file name must not contain path separators: '{}'", file_name),
            "file_name",
        ));
    } else if !is_valid_identifier(artifact.type_name()) {
        errors.push(ValidationError::with_path(
            ErrorCode::InvalidArtifactName,
            format!("artifact file name must start with a type identifier: '{}'", file_name),
            "file_name",
        ));
    }

    for message in artifact_path_safety_errors(&artifact.relative_path()) {
        errors.push(ValidationError::with_path(
            ErrorCode::UnsafeArtifactPath,
            message,
            "path",
        ));
    }

    errors
}

pub(super) fn artifact_path_safety_errors(path: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if path.is_empty() {
        errors.push("artifact path cannot be empty".to_string());
        return errors;
    }

    // Absolute paths (leading slash)
    if path.starts_with('/') || path.starts_with('\\') {
        errors.push(format!(
            "artifact path must be relative, not absolute: '{}'",
            path
        ));
    }

    // Windows drive letter
    if path.len() >= 2 && path.chars().nth(1) == Some(':') {
        errors.push(format!(
            "artifact path must not contain drive letter: '{}'",
            path
        ));
    }

    if path.contains('\\') {
        errors.push(format!(
            "artifact path must use forward slashes only: '{}'",
            path
        ));
    }

    if path.contains('\0') {
        errors.push(format!("artifact path must not contain NUL: '{}'", path));
    }

    for segment in path.split('/') {
        if segment == ".." || segment == "." || segment.is_empty() {
            errors.push(format!(
                "artifact path must not contain empty, '.' or '..' segments: '{}'",
                path
            ));
            break;
        }
    }

    errors
}
