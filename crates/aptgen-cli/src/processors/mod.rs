//! Built-in processors.

mod kaptgen;

pub use kaptgen::{KaptgenProcessor, DEFAULT_MARKER, KAPTGEN_SUFFIX};

use aptgen_spec::is_valid_annotation_name;

use crate::error::ConfigurationError;
use crate::registry::ProcessorRegistry;

/// Registers every built-in processor.
///
/// `marker` is the annotation the kaptgen processor observes. It must be a
/// qualified type name; `"*"` is not accepted.
pub fn register_builtins(
    registry: &mut ProcessorRegistry,
    marker: &str,
) -> Result<(), ConfigurationError> {
    if !is_valid_annotation_name(marker) {
        return Err(ConfigurationError::InvalidMarker(marker.to_string()));
    }
    let kaptgen = KaptgenProcessor::new(marker);
    registry.register(kaptgen.capability(), kaptgen)
}
