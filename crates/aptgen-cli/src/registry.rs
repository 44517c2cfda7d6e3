//! Processor registry.
//!
//! Processors are registered explicitly at startup with the capability they
//! declare; the driver presents elements to them in registration order.

use std::collections::BTreeSet;

use aptgen_spec::{AnnotatedElement, ProcessorCapability, SourceVersion};

use crate::context::RoundContext;
use crate::error::{ConfigurationError, HandlerError};

/// A code-generation extension.
pub trait Processor {
    /// Inspects the elements that matched this processor's capability and
    /// requests artifacts through `ctx`.
    fn process(
        &mut self,
        elements: &[&AnnotatedElement],
        ctx: &mut RoundContext<'_>,
    ) -> Result<(), HandlerError>;
}

/// Adapts a closure into a [`Processor`].
struct FnProcessor<F>(F);

impl<F> Processor for FnProcessor<F>
where
    F: FnMut(&[&AnnotatedElement], &mut RoundContext<'_>) -> Result<(), HandlerError>,
{
    fn process(
        &mut self,
        elements: &[&AnnotatedElement],
        ctx: &mut RoundContext<'_>,
    ) -> Result<(), HandlerError> {
        (self.0)(elements, ctx)
    }
}

/// A capability paired with its handler.
pub struct RegisteredProcessor {
    pub(crate) capability: ProcessorCapability,
    pub(crate) handler: Box<dyn Processor>,
}

impl RegisteredProcessor {
    /// The declared capability.
    pub fn capability(&self) -> &ProcessorCapability {
        &self.capability
    }
}

/// Registry of processors for one compiler invocation.
#[derive(Default)]
pub struct ProcessorRegistry {
    entries: Vec<RegisteredProcessor>,
}

impl ProcessorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates a capability with a handler.
    ///
    /// Names must be unique; registering a second processor under an existing
    /// name is a configuration error.
    pub fn register<P>(
        &mut self,
        capability: ProcessorCapability,
        handler: P,
    ) -> Result<(), ConfigurationError>
    where
        P: Processor + 'static,
    {
        if self.get(&capability.name).is_some() {
            return Err(ConfigurationError::DuplicateProcessor(capability.name));
        }
        tracing::debug!(
            processor = %capability.name,
            annotations = capability.supported_annotations.len(),
            "registered processor"
        );
        self.entries.push(RegisteredProcessor {
            capability,
            handler: Box::new(handler),
        });
        Ok(())
    }

    /// Registers a closure as a handler.
    ///
    /// # Example
    /// ```
    /// use aptgen_cli::registry::ProcessorRegistry;
    /// use aptgen_spec::{GeneratedArtifact, ProcessorCapability};
    ///
    /// let mut registry = ProcessorRegistry::new();
    /// registry
    ///     .register_fn(ProcessorCapability::new("echo").annotation("p.Echo"), |elements, ctx| {
    ///         for e in elements {
    ///             ctx.emit(GeneratedArtifact::new(&e.package, format!("{}Echo.kt", e.name), ""));
    ///         }
    ///         Ok(())
    ///     })
    ///     .unwrap();
    /// assert_eq!(registry.len(), 1);
    /// ```
    pub fn register_fn<F>(
        &mut self,
        capability: ProcessorCapability,
        handler: F,
    ) -> Result<(), ConfigurationError>
    where
        F: FnMut(&[&AnnotatedElement], &mut RoundContext<'_>) -> Result<(), HandlerError>
            + 'static,
    {
        self.register(capability, FnProcessor(handler))
    }

    /// Union of every registered capability's annotation interests.
    pub fn supported_annotations(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .flat_map(|e| e.capability.supported_annotations.iter().cloned())
            .collect()
    }

    /// Highest source version any processor declares support for.
    pub fn latest_supported_version(&self) -> Option<SourceVersion> {
        self.entries
            .iter()
            .map(|e| e.capability.source_version)
            .max()
    }

    /// Union of every registered capability's option keys.
    pub fn supported_options(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .flat_map(|e| e.capability.supported_options.iter().cloned())
            .collect()
    }

    /// Looks up a processor by name.
    pub fn get(&self, name: &str) -> Option<&RegisteredProcessor> {
        self.entries.iter().find(|e| e.capability.name == name)
    }

    /// Registered processors in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, RegisteredProcessor> {
        self.entries.iter()
    }

    /// Capabilities in registration order.
    pub fn capabilities(&self) -> impl Iterator<Item = &ProcessorCapability> {
        self.entries.iter().map(|e| &e.capability)
    }

    /// Number of registered processors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries_mut(&mut self) -> std::slice::IterMut<'_, RegisteredProcessor> {
        self.entries.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &[&AnnotatedElement], _: &mut RoundContext<'_>) -> Result<(), HandlerError> {
        Ok(())
    }

    #[test]
    fn test_supported_annotations_union() {
        let mut registry = ProcessorRegistry::new();
        registry
            .register_fn(
                ProcessorCapability::new("a")
                    .annotation("p.A")
                    .annotation("p.Shared"),
                noop,
            )
            .unwrap();
        registry
            .register_fn(
                ProcessorCapability::new("b")
                    .annotation("p.B")
                    .annotation("p.Shared"),
                noop,
            )
            .unwrap();

        let all: Vec<_> = registry.supported_annotations().into_iter().collect();
        assert_eq!(all, vec!["p.A", "p.B", "p.Shared"]);
    }

    #[test]
    fn test_latest_supported_version() {
        let mut registry = ProcessorRegistry::new();
        assert_eq!(registry.latest_supported_version(), None);

        registry
            .register_fn(
                ProcessorCapability::new("old").source_version(SourceVersion::new(8)),
                noop,
            )
            .unwrap();
        registry
            .register_fn(
                ProcessorCapability::new("new").source_version(SourceVersion::new(17)),
                noop,
            )
            .unwrap();

        assert_eq!(
            registry.latest_supported_version(),
            Some(SourceVersion::new(17))
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut registry = ProcessorRegistry::new();
        registry
            .register_fn(ProcessorCapability::new("gen"), noop)
            .unwrap();
        let err = registry
            .register_fn(ProcessorCapability::new("gen"), noop)
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateProcessor(ref n) if n == "gen"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut registry = ProcessorRegistry::new();
        for name in ["z", "a", "m"] {
            registry
                .register_fn(ProcessorCapability::new(name).option(format!("{}.flag", name)), noop)
                .unwrap();
        }

        let names: Vec<_> = registry.capabilities().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert_eq!(registry.iter().next().unwrap().capability().name, "z");
        assert!(registry.supported_options().contains("a.flag"));
        assert!(registry.get("m").is_some());
        assert!(registry.get("q").is_none());
    }
}
