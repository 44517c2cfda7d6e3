//! Test harness utilities for running generation and inspecting outputs.

use std::fs;
use std::path::{Path, PathBuf};

use aptgen_cli::commands::generate::{self, GenerateOutcome};
use aptgen_cli::config::DriverConfig;
use aptgen_spec::ElementManifest;
use tempfile::TempDir;
use walkdir::WalkDir;

/// A scratch workspace holding a manifest and an output directory.
pub struct TestHarness {
    /// Working directory for test inputs and outputs.
    pub work_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness.
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().expect("Failed to create work dir"),
        }
    }

    /// Get the working directory path.
    pub fn path(&self) -> &Path {
        self.work_dir.path()
    }

    /// Generated-sources directory inside the workspace.
    pub fn out_dir(&self) -> PathBuf {
        self.path().join("generated")
    }

    /// Writes a manifest and returns its path.
    pub fn write_manifest(&self, manifest: &ElementManifest) -> PathBuf {
        let path = self.path().join("elements.json");
        let json = manifest.to_json_pretty().expect("Failed to serialize manifest");
        fs::write(&path, json).expect("Failed to write manifest");
        path
    }

    /// Config writing into [`TestHarness::out_dir`].
    pub fn config(&self) -> DriverConfig {
        DriverConfig {
            out_dir: Some(self.out_dir()),
            ..Default::default()
        }
    }

    /// Runs the generate command on `manifest` with `config`.
    pub fn generate_with(&self, manifest: &ElementManifest, config: &DriverConfig) -> GenerateOutcome {
        let path = self.write_manifest(manifest);
        generate::execute(&path, config).expect("generate failed to load manifest")
    }

    /// Runs the generate command with the default config.
    pub fn generate(&self, manifest: &ElementManifest) -> GenerateOutcome {
        self.generate_with(manifest, &self.config())
    }

    /// Relative paths (forward slashes) of every file under the output
    /// directory, sorted.
    pub fn generated_files(&self) -> Vec<String> {
        list_files(&self.out_dir())
    }

    /// Reads a generated file.
    pub fn read_generated(&self, relative: &str) -> String {
        fs::read_to_string(self.out_dir().join(relative))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorted relative paths of the files under `root`; empty if it is missing.
pub fn list_files(root: &Path) -> Vec<String> {
    if !root.exists() {
        return Vec::new();
    }
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path()
                .strip_prefix(root)
                .ok()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
        })
        .collect();
    files.sort();
    files
}

/// BLAKE3 hash of every file under `root`, keyed by relative path.
pub fn hash_tree(root: &Path) -> Vec<(String, String)> {
    list_files(root)
        .into_iter()
        .map(|rel| {
            let bytes = fs::read(root.join(&rel)).expect("Failed to read generated file");
            let hash = blake3::hash(&bytes).to_hex().to_string();
            (rel, hash)
        })
        .collect()
}
