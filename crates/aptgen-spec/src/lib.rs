//! aptgen Spec Library
//!
//! Types, validation, and hashing for the aptgen annotation-processing
//! contract: the elements a compiler front end presents to processors, the
//! capabilities processors declare, and the artifacts they request.
//!
//! # Example
//!
//! ```
//! use aptgen_spec::{AnnotatedElement, ElementManifest, ProcessorCapability};
//! use aptgen_spec::validation::validate_manifest;
//!
//! let manifest = ElementManifest::new()
//!     .source_version("1.8")
//!     .element(AnnotatedElement::new("p", "Foo").annotated("p.Marker"));
//!
//! assert!(validate_manifest(&manifest).is_ok());
//!
//! let capability = ProcessorCapability::new("gen").annotation("p.Marker");
//! assert!(capability.matches(&manifest.elements[0]));
//! ```
//!
//! # Modules
//!
//! - [`element`]: Annotated elements and the element manifest
//! - [`capability`]: Processor capabilities and source versions
//! - [`artifact`]: Generated and written artifacts
//! - [`options`]: Processor `key=value` options
//! - [`error`]: Error and warning codes
//! - [`validation`]: Manifest and artifact validation
//! - [`hash`]: BLAKE3 hashing
//! - [`report`]: Report types and builder

pub mod artifact;
pub mod capability;
pub mod element;
pub mod error;
pub mod hash;
pub mod options;
pub mod report;
pub mod validation;

pub use artifact::{ArtifactKey, GeneratedArtifact, WrittenArtifact};
pub use capability::{ProcessorCapability, SourceVersion, ALL_ANNOTATIONS};
pub use element::{AnnotatedElement, ElementKind, ElementManifest, MANIFEST_VERSION};
pub use error::{
    ErrorCode, SpecError, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
pub use hash::{canonical_manifest_hash, content_hash, round_hash};
pub use options::{OptionsError, ProcessorOptions, GENERATED_DIR_OPTION};
pub use report::{
    ProcessorStats, Report, ReportBuilder, ReportError, ReportWarning, RoundSummary,
    REPORT_VERSION,
};
pub use validation::{
    is_safe_artifact_path, is_valid_annotation_name, is_valid_identifier, is_valid_package,
    validate_artifact, validate_manifest,
};
