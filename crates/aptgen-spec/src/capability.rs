//! Processor capability descriptors.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::element::AnnotatedElement;

/// Annotation pattern that observes every element.
pub const ALL_ANNOTATIONS: &str = "*";

/// Source language version, numbered like JVM releases (8, 11, 17, ...).
///
/// Parses the spellings build tools commonly pass around: `"8"`, `"1.8"`,
/// and `"RELEASE_8"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceVersion(u32);

impl SourceVersion {
    /// Version assumed when nothing else is declared.
    pub const DEFAULT: SourceVersion = SourceVersion(8);

    /// Creates a version from a release number.
    pub const fn new(release: u32) -> Self {
        Self(release)
    }

    /// Returns the release number.
    pub fn release(&self) -> u32 {
        self.0
    }
}

impl Default for SourceVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for SourceVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SourceVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("RELEASE_").unwrap_or(trimmed);
        // Legacy "1.x" spelling for releases up to 8.
        let digits = match digits.strip_prefix("1.") {
            Some(rest) if !rest.is_empty() => rest,
            _ => digits,
        };
        match digits.parse::<u32>() {
            Ok(release) if release > 0 => Ok(SourceVersion(release)),
            _ => Err(format!("invalid source version: '{}'", s)),
        }
    }
}

impl TryFrom<String> for SourceVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SourceVersion> for String {
    fn from(value: SourceVersion) -> Self {
        value.to_string()
    }
}

/// Declares which annotation types a processor observes, the source
/// version it supports, and the options it understands.
///
/// Set once at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorCapability {
    /// Unique processor name.
    pub name: String,
    /// Fully qualified annotation names, or `"*"` for every element.
    pub supported_annotations: BTreeSet<String>,
    /// Source version the processor declares support for.
    pub source_version: SourceVersion,
    /// Option keys the processor reads.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub supported_options: BTreeSet<String>,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProcessorCapability {
    /// Creates a capability that observes nothing yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supported_annotations: BTreeSet::new(),
            source_version: SourceVersion::DEFAULT,
            supported_options: BTreeSet::new(),
            description: None,
        }
    }

    /// Adds an observed annotation type.
    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.supported_annotations.insert(annotation.into());
        self
    }

    /// Sets the supported source version.
    pub fn source_version(mut self, version: SourceVersion) -> Self {
        self.source_version = version;
        self
    }

    /// Adds a supported option key.
    pub fn option(mut self, key: impl Into<String>) -> Self {
        self.supported_options.insert(key.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns true if the capability observes every element.
    pub fn observes_all(&self) -> bool {
        self.supported_annotations.contains(ALL_ANNOTATIONS)
    }

    /// Checks whether the element's annotations intersect this capability.
    pub fn matches(&self, element: &AnnotatedElement) -> bool {
        self.observes_all()
            || element
                .annotations
                .iter()
                .any(|a| self.supported_annotations.contains(a))
    }
}
