//! Annotated program elements presented to processors.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Current element manifest version.
pub const MANIFEST_VERSION: u32 = 1;

/// Kind of program element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// A class declaration.
    #[default]
    Class,
    /// An interface declaration.
    Interface,
    /// A singleton object declaration.
    Object,
    /// An enum class.
    Enum,
    /// An annotation class.
    Annotation,
    /// A top-level or member function.
    Function,
    /// A top-level or member property.
    Property,
}

impl ElementKind {
    /// Returns the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Class => "class",
            ElementKind::Interface => "interface",
            ElementKind::Object => "object",
            ElementKind::Enum => "enum",
            ElementKind::Annotation => "annotation",
            ElementKind::Function => "function",
            ElementKind::Property => "property",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reference into a parsed program: simple name, enclosing package, and
/// the marker annotations declared on it.
///
/// Elements are immutable snapshots produced by the compilation front end
/// and live for one round.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnotatedElement {
    /// Dotted package name; empty for the default package.
    #[serde(default)]
    pub package: String,
    /// Simple name of the element.
    pub name: String,
    /// Element kind.
    #[serde(default)]
    pub kind: ElementKind,
    /// Fully qualified names of the annotations on this element.
    #[serde(default)]
    pub annotations: BTreeSet<String>,
}

impl AnnotatedElement {
    /// Creates a class element with no annotations.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            kind: ElementKind::Class,
            annotations: BTreeSet::new(),
        }
    }

    /// Adds an annotation.
    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.insert(annotation.into());
        self
    }

    /// Sets the element kind.
    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns `package.Name`, or just `Name` in the default package.
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    /// Checks whether this element carries the given annotation.
    pub fn has_annotation(&self, annotation: &str) -> bool {
        self.annotations.contains(annotation)
    }
}

impl std::fmt::Display for AnnotatedElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.qualified_name())
    }
}

/// Input document describing the annotated elements of one compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementManifest {
    /// Schema version; must be 1.
    pub manifest_version: u32,
    /// Source language version of the compilation (e.g., "1.8", "17").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_version: Option<String>,
    /// Elements of the first round.
    #[serde(default)]
    pub elements: Vec<AnnotatedElement>,
}

impl ElementManifest {
    /// Creates an empty manifest at the current version.
    pub fn new() -> Self {
        Self {
            manifest_version: MANIFEST_VERSION,
            source_version: None,
            elements: Vec::new(),
        }
    }

    /// Adds an element.
    pub fn element(mut self, element: AnnotatedElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Sets the source version.
    pub fn source_version(mut self, version: impl Into<String>) -> Self {
        self.source_version = Some(version.into());
        self
    }

    /// Parses a manifest from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the manifest to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Converts the manifest to a JSON value for hashing.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl Default for ElementManifest {
    fn default() -> Self {
        Self::new()
    }
}
