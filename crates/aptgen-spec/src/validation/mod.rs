//! Element manifest and artifact validation.

mod path_safety;


use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::capability::SourceVersion;
use crate::element::{AnnotatedElement, ElementManifest, MANIFEST_VERSION};
use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};

pub use path_safety::{is_safe_artifact_path, validate_artifact};

/// JVM identifier, ASCII subset.
const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_$][A-Za-z0-9_$]*$";

static IDENTIFIER_REGEX: OnceLock<Regex> = OnceLock::new();

fn identifier_regex() -> &'static Regex {
    IDENTIFIER_REGEX.get_or_init(|| Regex::new(IDENTIFIER_PATTERN).expect("invalid regex pattern"))
}

/// Checks if a string is a valid simple name.
///
/// # Example
/// ```
/// use aptgen_spec::validation::is_valid_identifier;
///
/// assert!(is_valid_identifier("Foo_kaptgen"));
/// assert!(!is_valid_identifier("1Foo"));
/// assert!(!is_valid_identifier("a.b"));
/// ```
pub fn is_valid_identifier(name: &str) -> bool {
    identifier_regex().is_match(name)
}

/// Checks if a string is a dotted package name. The empty string denotes the
/// default package and is valid.
pub fn is_valid_package(package: &str) -> bool {
    package.is_empty() || package.split('.').all(is_valid_identifier)
}

/// Checks if a string is a qualified annotation type name (`pkg.Name` or `Name`).
pub fn is_valid_annotation_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_valid_identifier)
}

/// Validates an element manifest.
///
/// Errors reject the manifest; warnings are reported but do not stop
/// generation. Two elements that share a qualified name and kind are only a
/// warning here: if their generated outputs collide, the driver fails the
/// round instead.
pub fn validate_manifest(manifest: &ElementManifest) -> ValidationResult {
    let mut result = ValidationResult::default();

    if manifest.manifest_version != MANIFEST_VERSION {
        result.add_error(ValidationError::with_path(
            ErrorCode::UnsupportedManifestVersion,
            format!(
                "manifest_version must be {}, got {}",
                MANIFEST_VERSION, manifest.manifest_version
            ),
            "manifest_version",
        ));
    }

    if let Some(ref version) = manifest.source_version {
        if let Err(message) = version.parse::<SourceVersion>() {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidSourceVersion,
                message,
                "source_version",
            ));
        }
    }

    if manifest.elements.is_empty() {
        result.add_warning(ValidationWarning::new(
            WarningCode::EmptyManifest,
            "manifest lists no elements; nothing will be generated",
        ));
    }

    let mut seen = HashSet::new();
    for (index, element) in manifest.elements.iter().enumerate() {
        validate_element(element, index, &mut result);

        if !seen.insert((element.qualified_name(), element.kind)) {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::DuplicateElement,
                format!("{} is listed more than once", element),
                format!("elements[{}]", index),
            ));
        }
    }

    result
}

/// Validates a single element, appending to `result`.
pub fn validate_element(element: &AnnotatedElement, index: usize, result: &mut ValidationResult) {
    if !is_valid_identifier(&element.name) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidIdentifier,
            format!("element name is not a valid identifier: '{}'", element.name),
            format!("elements[{}].name", index),
        ));
    }

    if !is_valid_package(&element.package) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidPackage,
            format!("package is not a dotted identifier path: '{}'", element.package),
            format!("elements[{}].package", index),
        ));
    }

    for annotation in &element.annotations {
        if !is_valid_annotation_name(annotation) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidAnnotationName,
                format!("annotation is not a qualified type name: '{}'", annotation),
                format!("elements[{}].annotations", index),
            ));
        }
    }

    if element.annotations.is_empty() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::NoAnnotations,
            format!("{} carries no annotations", element),
            format!("elements[{}].annotations", index),
        ));
    }
}
