//! Property-based validation tests for aptgen using proptest.
//!
//! These tests verify that validation functions never panic and agree with
//! the documented identifier and path rules for arbitrary inputs.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p aptgen-tests --test proptest_validation
//! ```

use proptest::prelude::*;

use aptgen_cli::processors::KaptgenProcessor;
use aptgen_spec::validation::{
    is_safe_artifact_path, is_valid_identifier, is_valid_package, validate_artifact,
};
use aptgen_spec::{AnnotatedElement, ProcessorOptions, SourceVersion};

// ============================================================================
// 1. Identifiers and packages
// ============================================================================

fn identifier() -> impl Strategy<Value = String> {
    "[A-Za-z_$][A-Za-z0-9_$]{0,20}"
}

fn package() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9_]{0,8}", 0..5).prop_map(|segments| segments.join("."))
}

proptest! {
    /// Random strings never panic when validated.
    #[test]
    fn identifier_validation_never_panics(s in "\\PC{0,40}") {
        let _ = is_valid_identifier(&s);
        let _ = is_valid_package(&s);
        let _ = is_safe_artifact_path(&s);
    }

    /// Generated identifiers are accepted.
    #[test]
    fn valid_identifiers_pass(id in identifier()) {
        prop_assert!(is_valid_identifier(&id), "Expected valid identifier: '{}'", id);
    }

    /// Identifiers starting with a digit always fail.
    #[test]
    fn digit_start_identifiers_fail(first in "[0-9]", rest in "[A-Za-z0-9_]{0,10}") {
        let id = format!("{}{}", first, rest);
        prop_assert!(!is_valid_identifier(&id));
    }

    /// Dotted packages built from identifiers are accepted, including the
    /// default package.
    #[test]
    fn dotted_packages_pass(pkg in package()) {
        prop_assert!(is_valid_package(&pkg), "Expected valid package: '{}'", pkg);
    }

    /// A trailing or doubled dot is never a valid package.
    #[test]
    fn malformed_packages_fail(pkg in package().prop_filter("non-empty", |p| !p.is_empty())) {
        let trailing = format!("{}.", pkg);
        let doubled = format!("{}..x", pkg);
        prop_assert!(!is_valid_package(&trailing));
        prop_assert!(!is_valid_package(&doubled));
    }
}

// ============================================================================
// 2. Artifact paths
// ============================================================================

proptest! {
    /// Every kaptgen artifact for a valid element is writable and lands in
    /// the element's package directory.
    #[test]
    fn kaptgen_artifacts_are_valid(pkg in package(), name in identifier()) {
        let element = AnnotatedElement::new(pkg.clone(), name.clone());
        let artifact = KaptgenProcessor::render(&element);

        prop_assert!(validate_artifact(&artifact).is_empty());
        prop_assert_eq!(artifact.file_name.clone(), format!("{}_kaptgen.kt", name));

        let expected_dir = pkg.replace('.', "/");
        let path = artifact.relative_path();
        if expected_dir.is_empty() {
            prop_assert!(!path.contains('/'));
        } else {
            let prefix = format!("{}/", expected_dir);
            prop_assert!(path.starts_with(&prefix));
        }
        let class_line = format!("class {}_kaptgen\n", name);
        prop_assert!(artifact.content.ends_with(&class_line));
    }

    /// Paths containing a parent-directory segment are never safe.
    #[test]
    fn parent_segments_unsafe(prefix in "[a-z]{1,8}", suffix in "[A-Za-z]{1,8}\\.kt") {
        let path = format!("{}/../{}", prefix, suffix);
        prop_assert!(!is_safe_artifact_path(&path));
    }

    /// Absolute paths are never safe.
    #[test]
    fn absolute_paths_unsafe(rest in "[a-z/]{0,20}") {
        let path = format!("/{}", rest);
        prop_assert!(!is_safe_artifact_path(&path));
    }
}

// ============================================================================
// 3. Options and source versions
// ============================================================================

proptest! {
    /// Well-formed key=value options always parse back to their value.
    #[test]
    fn options_parse(key in "[a-z][a-z.]{0,15}", value in "[^=]{0,20}") {
        let entry = format!("{}={}", key, value);
        let options = ProcessorOptions::parse([entry.as_str()]).unwrap();
        prop_assert_eq!(options.get(key.trim()), Some(value.as_str()));
    }

    /// Entries without '=' are rejected.
    #[test]
    fn options_without_separator_rejected(entry in "[a-z.]{1,20}") {
        prop_assert!(ProcessorOptions::parse([entry.as_str()]).is_err());
    }

    /// All three release spellings parse to the same version.
    #[test]
    fn source_version_spellings_agree(release in 1u32..40) {
        let plain: SourceVersion = release.to_string().parse().unwrap();
        let prefixed: SourceVersion = format!("RELEASE_{}", release).parse().unwrap();
        prop_assert_eq!(plain, SourceVersion::new(release));
        prop_assert_eq!(prefixed, SourceVersion::new(release));
    }
}
