//! End-to-End Generation Tests for aptgen
//!
//! Tests verify:
//! - Manifest -> generated sources through the generate command
//! - Failed rounds leave no new files
//! - Multi-round sessions converge or hit the round limit
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p aptgen-tests --test e2e_generation
//! ```

use std::fs;

use aptgen_cli::commands::{generate, EXIT_INVALID, EXIT_ROUND_FAILED};
use aptgen_cli::config::DriverConfig;
use aptgen_cli::processors::{register_builtins, DEFAULT_MARKER};
use aptgen_cli::{
    GenerationDriver, HandlerError, ProcessorRegistry, RoundError, RoundInput, Session,
};
use aptgen_spec::{
    AnnotatedElement, ElementManifest, GeneratedArtifact, ProcessorCapability, Report,
    SourceVersion, ALL_ANNOTATIONS,
};
use aptgen_tests::harness::list_files;
use aptgen_tests::{marked, ManifestFixture, TestHarness};
use pretty_assertions::assert_eq;

// ============================================================================
// Generate command
// ============================================================================

#[test]
fn test_marked_element_generates_companion() {
    let harness = TestHarness::new();
    let outcome = harness.generate(&ManifestFixture::single());

    assert_eq!(outcome.exit, 0, "errors: {:?}", outcome.report.errors);
    assert_eq!(harness.generated_files(), vec!["p/Foo_kaptgen.kt"]);
    assert_eq!(
        harness.read_generated("p/Foo_kaptgen.kt"),
        "package p\n\nclass Foo_kaptgen\n"
    );

    let written: Vec<_> = outcome.report.outputs().collect();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].processor, "kaptgen");
    assert_eq!(written[0].package, "p");
    assert!(outcome.report.output_hash.is_some());
}

#[test]
fn test_mixed_manifest() {
    let harness = TestHarness::new();
    let outcome = harness.generate(&ManifestFixture::mixed());

    assert_eq!(outcome.exit, 0);
    assert_eq!(
        harness.generated_files(),
        vec![
            "TopLevel_kaptgen.kt",
            "com/example/app/MainActivity_kaptgen.kt",
            "com/example/model/User_kaptgen.kt",
        ]
    );
    assert_eq!(
        harness.read_generated("TopLevel_kaptgen.kt"),
        "class TopLevel_kaptgen\n"
    );
    assert_eq!(
        harness.read_generated("com/example/model/User_kaptgen.kt"),
        "package com.example.model\n\nclass User_kaptgen\n"
    );
    assert_eq!(outcome.report.source_version.as_deref(), Some("8"));

    let first = &outcome.report.rounds[0];
    assert_eq!(first.elements, 5);
    assert_eq!(first.processors[0].matched_elements, 3);
}

#[test]
fn test_zero_matches_writes_nothing() {
    let harness = TestHarness::new();
    let outcome = harness.generate(&ManifestFixture::unmarked());

    assert_eq!(outcome.exit, 0);
    assert!(outcome.report.ok);
    assert_eq!(outcome.report.rounds.len(), 1);
    assert!(!outcome.report.rounds[0].processors[0].invoked);
    assert!(harness.generated_files().is_empty());
    assert!(outcome.report.output_hash.is_none());
}

#[test]
fn test_colliding_names_write_nothing() {
    let harness = TestHarness::new();
    let manifest = ElementManifest::new()
        .element(marked("p", "Bar"))
        .element(marked("p", "Foo"))
        .element(marked("p", "Foo"));

    let outcome = harness.generate(&manifest);

    assert_eq!(outcome.exit, EXIT_ROUND_FAILED);
    assert_eq!(outcome.report.errors[0].code, "E010");
    assert_eq!(
        outcome.report.errors[0].message,
        "round 1: duplicate artifact p/Foo_kaptgen.kt: requested by 'kaptgen' and 'kaptgen'"
    );
    assert_eq!(
        outcome.report.errors[0].path.as_deref(),
        Some("p/Foo_kaptgen.kt")
    );
    assert!(outcome.report.warnings.iter().any(|w| w.code == "W003"));
    assert!(harness.generated_files().is_empty());
}

#[test]
fn test_missing_output_directory() {
    let harness = TestHarness::new();
    let outcome = harness.generate_with(&ManifestFixture::single(), &DriverConfig::default());

    assert_eq!(outcome.exit, EXIT_INVALID);
    assert_eq!(outcome.report.errors[0].code, "E006");
}

#[test]
fn test_output_directory_from_option() {
    let harness = TestHarness::new();
    let config = DriverConfig {
        options: vec![format!(
            "kapt.kotlin.generated={}",
            harness.out_dir().display()
        )],
        ..Default::default()
    };

    let outcome = harness.generate_with(&ManifestFixture::single(), &config);
    assert_eq!(outcome.exit, 0);
    assert_eq!(harness.generated_files(), vec!["p/Foo_kaptgen.kt"]);
}

#[test]
fn test_malformed_option() {
    let harness = TestHarness::new();
    let config = DriverConfig {
        options: vec!["a=b=c".to_string()],
        ..harness.config()
    };

    let outcome = harness.generate_with(&ManifestFixture::single(), &config);
    assert_eq!(outcome.exit, EXIT_INVALID);
    assert_eq!(outcome.report.errors[0].code, "E009");
    assert!(harness.generated_files().is_empty());
}

#[test]
fn test_unrecognized_option_and_newer_source_version_warn() {
    let harness = TestHarness::new();
    let config = DriverConfig {
        options: vec!["verbose.codegen=true".to_string()],
        source_version: Some(SourceVersion::new(21)),
        ..harness.config()
    };

    let outcome = harness.generate_with(&ManifestFixture::single(), &config);
    assert_eq!(outcome.exit, 0);

    let codes: Vec<_> = outcome.report.warnings.iter().map(|w| w.code.as_str()).collect();
    assert!(codes.contains(&"W004"), "warnings: {:?}", codes);
    assert!(codes.contains(&"W005"), "warnings: {:?}", codes);
    assert_eq!(harness.generated_files(), vec!["p/Foo_kaptgen.kt"]);
}

#[test]
fn test_custom_marker() {
    let harness = TestHarness::new();
    let manifest = ElementManifest::new()
        .element(AnnotatedElement::new("q", "Custom").annotated("my.Marker"))
        .element(marked("q", "Default"));
    let config = DriverConfig {
        marker: "my.Marker".to_string(),
        ..harness.config()
    };

    let outcome = harness.generate_with(&manifest, &config);
    assert_eq!(outcome.exit, 0);
    assert_eq!(harness.generated_files(), vec!["q/Custom_kaptgen.kt"]);
}

#[test]
fn test_invalid_marker_rejected() {
    let harness = TestHarness::new();
    for marker in ["", "*"] {
        let config = DriverConfig {
            marker: marker.to_string(),
            ..harness.config()
        };

        let outcome = harness.generate_with(&ManifestFixture::single(), &config);
        assert_eq!(outcome.exit, EXIT_INVALID);
        assert_eq!(outcome.report.errors[0].code, "E004");
        assert!(harness.generated_files().is_empty());
    }
}

#[test]
fn test_invalid_manifest_writes_nothing() {
    let harness = TestHarness::new();
    let manifest = ElementManifest::new().element(marked("p..q", "Foo"));

    let outcome = harness.generate(&manifest);
    assert_eq!(outcome.exit, EXIT_INVALID);
    assert_eq!(outcome.report.errors[0].code, "E003");
    assert!(!harness.out_dir().exists());
}

#[test]
fn test_round_limit_keeps_completed_rounds() {
    let harness = TestHarness::new();
    let config = DriverConfig {
        max_rounds: 1,
        ..harness.config()
    };

    let outcome = harness.generate_with(&ManifestFixture::single(), &config);
    assert_eq!(outcome.exit, EXIT_ROUND_FAILED);
    assert_eq!(outcome.report.errors[0].code, "E014");
    assert_eq!(outcome.report.rounds.len(), 1);
    // Round 1 completed before the limit was hit.
    assert_eq!(harness.generated_files(), vec!["p/Foo_kaptgen.kt"]);
}

#[test]
fn test_clean_removes_stale_files() {
    let harness = TestHarness::new();
    fs::create_dir_all(harness.out_dir().join("old")).unwrap();
    fs::write(harness.out_dir().join("old/Stale_kaptgen.kt"), "stale").unwrap();

    let config = DriverConfig {
        clean: true,
        ..harness.config()
    };
    let outcome = harness.generate_with(&ManifestFixture::single(), &config);

    assert_eq!(outcome.exit, 0);
    assert_eq!(harness.generated_files(), vec!["p/Foo_kaptgen.kt"]);
}

#[test]
fn test_existing_file_is_replaced() {
    let harness = TestHarness::new();
    fs::create_dir_all(harness.out_dir().join("p")).unwrap();
    fs::write(harness.out_dir().join("p/Foo_kaptgen.kt"), "old contents").unwrap();

    let outcome = harness.generate(&ManifestFixture::single());
    assert_eq!(outcome.exit, 0);
    assert_eq!(
        harness.read_generated("p/Foo_kaptgen.kt"),
        "package p\n\nclass Foo_kaptgen\n"
    );
}

#[test]
fn test_write_failure_rolls_back_round() {
    let harness = TestHarness::new();
    // A directory squatting on the second destination makes its move fail
    // after the first file has already been moved into place.
    fs::create_dir_all(harness.out_dir().join("p/Foo_kaptgen.kt")).unwrap();
    let manifest = ElementManifest::new()
        .element(marked("a", "First"))
        .element(marked("p", "Foo"));

    let outcome = harness.generate(&manifest);

    assert_eq!(outcome.exit, EXIT_ROUND_FAILED);
    assert_eq!(outcome.report.errors[0].code, "E015");
    assert!(harness.generated_files().is_empty());
    assert!(!harness.out_dir().join("a").exists());
}

#[test]
fn test_write_failure_restores_replaced_file() {
    let harness = TestHarness::new();
    fs::create_dir_all(harness.out_dir().join("a")).unwrap();
    fs::write(harness.out_dir().join("a/First_kaptgen.kt"), "previous").unwrap();
    fs::create_dir_all(harness.out_dir().join("p/Foo_kaptgen.kt")).unwrap();
    let manifest = ElementManifest::new()
        .element(marked("a", "First"))
        .element(marked("p", "Foo"));

    let outcome = harness.generate(&manifest);

    assert_eq!(outcome.exit, EXIT_ROUND_FAILED);
    assert_eq!(outcome.report.errors[0].code, "E015");
    assert_eq!(harness.read_generated("a/First_kaptgen.kt"), "previous");
    assert_eq!(harness.generated_files(), vec!["a/First_kaptgen.kt"]);
}

#[test]
fn test_report_file_written() {
    let harness = TestHarness::new();
    let manifest_path = harness.write_manifest(&ManifestFixture::single());
    let report_path = harness.path().join("report.json");

    generate::run(
        manifest_path.to_str().unwrap(),
        &harness.config(),
        Some(report_path.to_str().unwrap()),
        true,
    )
    .unwrap();

    let report = Report::from_json(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert!(report.ok);
    assert_eq!(report.outputs().count(), 1);

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(value["rounds"][0]["outputs"][0]["path"], "p/Foo_kaptgen.kt");
}

// ============================================================================
// Library API
// ============================================================================

fn kaptgen_registry() -> ProcessorRegistry {
    let mut registry = ProcessorRegistry::new();
    register_builtins(&mut registry, DEFAULT_MARKER).unwrap();
    registry
}

#[test]
fn test_handler_failure_writes_nothing() {
    let harness = TestHarness::new();
    let mut registry = kaptgen_registry();
    registry
        .register_fn(
            ProcessorCapability::new("strict").annotation(DEFAULT_MARKER),
            |elements, _| Err(HandlerError::at(elements[0], "unsupported element")),
        )
        .unwrap();

    let driver = GenerationDriver::with_output_dir(harness.out_dir());
    let input = RoundInput::first(vec![marked("p", "Foo")]);
    let err = driver.run_round(&input, &mut registry).unwrap_err();

    match err {
        RoundError::Handler { processor, source } => {
            assert_eq!(processor, "strict");
            assert_eq!(source.element.as_deref(), Some("p.Foo"));
        }
        other => panic!("expected handler error, got {other:?}"),
    }
    assert!(harness.generated_files().is_empty());
}

#[test]
fn test_session_runs_generated_sources_through_later_rounds() {
    let harness = TestHarness::new();
    let mut registry = kaptgen_registry();
    registry
        .register_fn(
            ProcessorCapability::new("companion").annotation(ALL_ANNOTATIONS),
            |elements, ctx| {
                for e in elements.iter().filter(|e| e.name.ends_with("_kaptgen")) {
                    ctx.emit(GeneratedArtifact::new(
                        e.package.clone(),
                        format!("{}Companion.kt", e.name),
                        format!("object {}Companion\n", e.name),
                    ));
                }
                Ok(())
            },
        )
        .unwrap();

    let mut session = Session::new(GenerationDriver::with_output_dir(harness.out_dir()), registry);
    let outcome = session
        .run(vec![marked("p", "Foo")], SourceVersion::DEFAULT)
        .unwrap();

    assert_eq!(outcome.rounds.len(), 3);
    assert_eq!(outcome.rounds[0].written[0].processor, "kaptgen");
    assert_eq!(outcome.rounds[1].written[0].processor, "companion");
    assert!(outcome.rounds[2].written.is_empty());
    assert_eq!(
        list_files(&harness.out_dir()),
        vec!["p/Foo_kaptgen.kt", "p/Foo_kaptgenCompanion.kt"]
    );
}

#[test]
fn test_registration_order_decides_first_claim() {
    let harness = TestHarness::new();
    let mut registry = ProcessorRegistry::new();
    for name in ["late", "early"] {
        registry
            .register_fn(ProcessorCapability::new(name).annotation(DEFAULT_MARKER), |_, ctx| {
                ctx.emit(GeneratedArtifact::new("p", "Shared.kt", ""));
                Ok(())
            })
            .unwrap();
    }

    let driver = GenerationDriver::with_output_dir(harness.out_dir());
    let err = driver
        .run_round(&RoundInput::first(vec![marked("p", "Foo")]), &mut registry)
        .unwrap_err();

    match err {
        RoundError::DuplicateArtifact { first, second, .. } => {
            assert_eq!(first, "'late'");
            assert_eq!(second, "'early'");
        }
        other => panic!("expected duplicate artifact, got {other:?}"),
    }
    assert!(harness.generated_files().is_empty());
}
