//! BLAKE3 hashing for manifests and generated outputs.
//!
//! Hashes are lowercase hex strings (64 characters). Generation is expected
//! to be reproducible: the same manifest and processors produce the same
//! artifact hashes and therefore the same round hash.

use crate::artifact::WrittenArtifact;
use crate::element::ElementManifest;
use crate::error::SpecError;

/// Hashes raw bytes.
///
/// # Example
/// ```
/// use aptgen_spec::hash::content_hash;
///
/// let hash = content_hash(b"class Foo_kaptgen\n");
/// assert_eq!(hash.len(), 64);
/// ```
pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Hashes a manifest through its compact JSON form.
///
/// `serde_json` objects are key-sorted and element annotations are kept in a
/// sorted set, so the encoding does not depend on field order in the source
/// file.
pub fn canonical_manifest_hash(manifest: &ElementManifest) -> Result<String, SpecError> {
    let value = manifest.to_value()?;
    let canonical = serde_json::to_string(&value)?;
    Ok(content_hash(canonical.as_bytes()))
}

/// Combines written artifacts into one hash, independent of write order.
///
/// ```text
/// round_hash = hex(BLAKE3(sorted("path:hash\n" ...)))
/// ```
pub fn round_hash(outputs: &[WrittenArtifact]) -> String {
    let mut lines: Vec<String> = outputs
        .iter()
        .map(|o| format!("{}:{}\n", o.path, o.hash))
        .collect();
    lines.sort();

    let mut hasher = blake3::Hasher::new();
    for line in &lines {
        hasher.update(line.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
