//! Generated artifact types.

use serde::{Deserialize, Serialize};

/// Identity of an artifact within a round: its package and file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactKey {
    /// Dotted package name; empty for the default package.
    pub package: String,
    /// File name including extension.
    pub file_name: String,
}

impl ArtifactKey {
    /// Returns the path relative to the output root, using forward slashes.
    ///
    /// `com.example` + `Foo_kaptgen.kt` becomes `com/example/Foo_kaptgen.kt`.
    pub fn relative_path(&self) -> String {
        if self.package.is_empty() {
            self.file_name.clone()
        } else {
            format!("{}/{}", self.package.replace('.', "/"), self.file_name)
        }
    }
}

impl std::fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.relative_path())
    }
}

/// A source file requested by a processor.
///
/// Owned by the generation driver until flushed to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    /// Dotted package name; empty for the default package.
    pub package: String,
    /// File name including extension.
    pub file_name: String,
    /// File contents.
    pub content: String,
}

impl GeneratedArtifact {
    /// Creates a new artifact.
    pub fn new(
        package: impl Into<String>,
        file_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Returns the (package, file name) identity.
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey {
            package: self.package.clone(),
            file_name: self.file_name.clone(),
        }
    }

    /// Returns the path relative to the output root.
    pub fn relative_path(&self) -> String {
        self.key().relative_path()
    }

    /// Returns the file name without its extension.
    pub fn type_name(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.file_name,
        }
    }
}

/// An artifact that has been persisted to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenArtifact {
    /// Path relative to the output root (forward slashes).
    pub path: String,
    /// Package the artifact was generated into.
    pub package: String,
    /// Name of the processor that requested it.
    pub processor: String,
    /// BLAKE3 hash of the file contents (hex).
    pub hash: String,
    /// File size in bytes.
    pub size: u64,
}

impl WrittenArtifact {
    /// Returns the file name (last path segment).
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Returns the (package, file name) identity this file was written under.
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey {
            package: self.package.clone(),
            file_name: self.file_name().to_string(),
        }
    }
}
