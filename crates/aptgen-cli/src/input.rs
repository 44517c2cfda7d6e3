//! Element manifest loading.

use std::path::{Path, PathBuf};

use aptgen_spec::ElementManifest;
use thiserror::Error;

/// A loaded manifest with its provenance.
#[derive(Debug)]
pub struct LoadResult {
    /// The parsed manifest.
    pub manifest: ElementManifest,
    /// BLAKE3 hash of the raw file content (hex string).
    pub source_hash: String,
}

/// Errors that can occur while loading a manifest.
#[derive(Debug, Error)]
pub enum InputError {
    /// File could not be read.
    #[error("failed to read file '{}': {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {message}")]
    JsonParse { message: String },
}

/// Loads an element manifest from a JSON file.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use aptgen_cli::input::load_manifest;
///
/// let loaded = load_manifest(Path::new("elements.json")).unwrap();
/// println!("{} element(s)", loaded.manifest.elements.len());
/// ```
pub fn load_manifest(path: &Path) -> Result<LoadResult, InputError> {
    let content = std::fs::read_to_string(path).map_err(|e| InputError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let source_hash = blake3::hash(content.as_bytes()).to_hex().to_string();

    let manifest = ElementManifest::from_json(&content).map_err(|e| InputError::JsonParse {
        message: e.to_string(),
    })?;

    Ok(LoadResult {
        manifest,
        source_hash,
    })
}
