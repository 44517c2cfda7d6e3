//! Element manifest fixtures.

use aptgen_cli::processors::DEFAULT_MARKER;
use aptgen_spec::{AnnotatedElement, ElementManifest};

/// An element carrying the default kaptgen marker.
pub fn marked(package: &str, name: &str) -> AnnotatedElement {
    AnnotatedElement::new(package, name).annotated(DEFAULT_MARKER)
}

/// Canned manifests used across the end-to-end tests.
pub struct ManifestFixture;

impl ManifestFixture {
    /// `Foo` in package `p`, marked for kaptgen.
    pub fn single() -> ElementManifest {
        ElementManifest::new().element(marked("p", "Foo"))
    }

    /// Marked and unmarked elements across several packages, including the
    /// default package.
    pub fn mixed() -> ElementManifest {
        ElementManifest::new()
            .source_version("1.8")
            .element(marked("com.example.app", "MainActivity"))
            .element(marked("com.example.model", "User"))
            .element(AnnotatedElement::new("com.example.model", "Plain"))
            .element(marked("", "TopLevel"))
            .element(AnnotatedElement::new("com.example.util", "Helper").annotated("other.Marker"))
    }

    /// Elements that match nothing.
    pub fn unmarked() -> ElementManifest {
        ElementManifest::new()
            .element(AnnotatedElement::new("p", "A"))
            .element(AnnotatedElement::new("p", "B").annotated("other.Marker"))
    }
}
