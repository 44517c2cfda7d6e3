//! The kaptgen marker processor.
//!
//! For every element carrying the marker annotation it emits one empty class
//! named `<Element>_kaptgen` in the element's package.

use aptgen_spec::{AnnotatedElement, GeneratedArtifact, ProcessorCapability};

use crate::context::RoundContext;
use crate::error::HandlerError;
use crate::registry::Processor;

/// Marker annotation observed when none is configured.
pub const DEFAULT_MARKER: &str = "com.facebook.kapt.Kaptgen";

/// Suffix appended to the element name.
pub const KAPTGEN_SUFFIX: &str = "_kaptgen";

const NAME: &str = "kaptgen";

/// Generates an empty companion declaration per marked element.
#[derive(Debug, Clone)]
pub struct KaptgenProcessor {
    marker: String,
}

impl KaptgenProcessor {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// The annotation this processor observes.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn capability(&self) -> ProcessorCapability {
        ProcessorCapability::new(NAME)
            .annotation(&self.marker)
            .description(format!(
                "emits an empty <Name>{} class for each element annotated with @{}",
                KAPTGEN_SUFFIX, self.marker
            ))
    }

    /// Renders the artifact for one element.
    pub fn render(element: &AnnotatedElement) -> GeneratedArtifact {
        let type_name = format!("{}{}", element.name, KAPTGEN_SUFFIX);
        let mut content = String::new();
        if !element.package.is_empty() {
            content.push_str(&format!("package {}\n\n", element.package));
        }
        content.push_str(&format!("class {}\n", type_name));

        GeneratedArtifact::new(element.package.clone(), format!("{}.kt", type_name), content)
    }
}

impl Default for KaptgenProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl Processor for KaptgenProcessor {
    fn process(
        &mut self,
        elements: &[&AnnotatedElement],
        ctx: &mut RoundContext<'_>,
    ) -> Result<(), HandlerError> {
        for element in elements {
            ctx.emit(Self::render(element));
        }
        ctx.note(format!("generated {} declaration(s)", elements.len()));
        Ok(())
    }
}
