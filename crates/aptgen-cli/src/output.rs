//! Scoped access to the generated-sources directory.
//!
//! [`OutputDir::acquire`] creates the directory and takes an exclusive
//! advisory lock that is released when the handle is dropped, including on
//! early return after a failed write. [`OutputDir::write_all`] stages every
//! artifact into a temp file beside its destination before moving any of them
//! into place. A file being replaced is first moved aside to a backup; if a
//! later move fails, new files are removed and backups are moved back.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use aptgen_spec::{content_hash, GeneratedArtifact, WrittenArtifact};
use fs2::FileExt;
use tempfile::{NamedTempFile, TempPath};

use crate::error::{ConfigurationError, RoundError};

/// Exclusive handle on the output directory for the duration of a flush.
pub struct OutputDir {
    root: PathBuf,
    lock: File,
}

impl OutputDir {
    /// Creates the directory if needed and locks it.
    ///
    /// The lock file lives beside the directory rather than inside it so it
    /// never shows up among the generated sources.
    pub fn acquire(root: &Path) -> Result<Self, ConfigurationError> {
        let unwritable = |source| ConfigurationError::UnwritableOutputDirectory {
            path: root.to_path_buf(),
            source,
        };

        fs::create_dir_all(root).map_err(unwritable)?;
        let root = fs::canonicalize(root).map_err(unwritable)?;

        let lock_path = lock_path(&root);
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(unwritable)?;
        lock.lock_exclusive().map_err(unwritable)?;
        tracing::debug!("locked {}", lock_path.display());

        Ok(Self { root, lock })
    }

    /// Canonical path of the directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes every artifact exactly once, or none of them.
    ///
    /// `artifacts` pairs each artifact with the name of the processor that
    /// requested it. Collisions must already have been rejected.
    pub fn write_all(
        &self,
        artifacts: &[(String, GeneratedArtifact)],
    ) -> Result<Vec<WrittenArtifact>, RoundError> {
        let mut created_dirs: Vec<PathBuf> = Vec::new();

        let staged = match self.stage(artifacts, &mut created_dirs) {
            Ok(staged) => staged,
            Err(err) => {
                // Staged temp files delete themselves on drop.
                remove_created_dirs(&created_dirs);
                return Err(err);
            }
        };

        let mut applied: Vec<Applied> = Vec::new();
        let mut written = Vec::with_capacity(staged.len());
        for entry in staged {
            if let Err(err) = apply(entry.file, &entry.dest, &mut applied) {
                tracing::warn!(
                    "rolling back {} file(s) after failing to write {}",
                    applied.len(),
                    entry.dest.display()
                );
                roll_back(applied);
                remove_created_dirs(&created_dirs);
                return Err(err);
            }
            written.push(entry.written);
        }

        // Dropping the applied entries deletes the backups.
        drop(applied);
        Ok(written)
    }

    fn stage(
        &self,
        artifacts: &[(String, GeneratedArtifact)],
        created_dirs: &mut Vec<PathBuf>,
    ) -> Result<Vec<StagedFile>, RoundError> {
        let mut staged = Vec::with_capacity(artifacts.len());
        for (processor, artifact) in artifacts {
            let rel_path = artifact.relative_path();
            let dest = self.root.join(&rel_path);
            let io_err = |source| RoundError::Io {
                path: dest.clone(),
                source,
            };

            let parent = dest.parent().unwrap_or(&self.root).to_path_buf();
            let missing = missing_ancestors(&parent, &self.root);
            fs::create_dir_all(&parent).map_err(io_err)?;
            created_dirs.extend(missing);

            let mut file = tempfile::Builder::new()
                .prefix(".aptgen-")
                .suffix(".tmp")
                .tempfile_in(&parent)
                .map_err(io_err)?;
            let bytes = artifact.content.as_bytes();
            file.write_all(bytes).map_err(io_err)?;
            file.flush().map_err(io_err)?;

            staged.push(StagedFile {
                written: WrittenArtifact {
                    path: rel_path,
                    package: artifact.package.clone(),
                    processor: processor.clone(),
                    hash: content_hash(bytes),
                    size: bytes.len() as u64,
                },
                dest,
                file,
            });
        }
        Ok(staged)
    }
}

impl Drop for OutputDir {
    fn drop(&mut self) {
        if let Err(e) = self.lock.unlock() {
            tracing::warn!("failed to release output directory lock: {}", e);
        }
    }
}

struct StagedFile {
    dest: PathBuf,
    file: NamedTempFile,
    written: WrittenArtifact,
}

/// A destination moved into place during this flush.
struct Applied {
    dest: PathBuf,
    /// Previous contents of `dest`, removed when dropped.
    backup: Option<TempPath>,
}

/// Moves a staged file onto `dest`, first moving any existing file aside.
fn apply(file: NamedTempFile, dest: &Path, applied: &mut Vec<Applied>) -> Result<(), RoundError> {
    let io_err = |source| RoundError::Io {
        path: dest.to_path_buf(),
        source,
    };

    let backup = if dest.is_file() {
        let parent = dest.parent().unwrap_or_else(|| Path::new("."));
        let backup = tempfile::Builder::new()
            .prefix(".aptgen-")
            .suffix(".bak")
            .tempfile_in(parent)
            .map_err(io_err)?
            .into_temp_path();
        fs::rename(dest, &backup).map_err(io_err)?;
        Some(backup)
    } else {
        None
    };

    if let Err(e) = file.persist(dest) {
        if let Some(backup) = &backup {
            let _ = fs::rename(backup, dest);
        }
        return Err(io_err(e.error));
    }

    applied.push(Applied {
        dest: dest.to_path_buf(),
        backup,
    });
    Ok(())
}

/// Undoes applied moves, newest first.
fn roll_back(applied: Vec<Applied>) {
    for entry in applied.into_iter().rev() {
        match entry.backup {
            Some(backup) => {
                if let Err(e) = fs::rename(&backup, &entry.dest) {
                    tracing::warn!("failed to restore {}: {}", entry.dest.display(), e);
                }
            }
            None => {
                let _ = fs::remove_file(&entry.dest);
            }
        }
    }
}

fn lock_path(root: &Path) -> PathBuf {
    match (root.parent(), root.file_name()) {
        (Some(parent), Some(name)) => {
            parent.join(format!(".{}.aptgen-lock", name.to_string_lossy()))
        }
        _ => root.join(".aptgen-lock"),
    }
}

/// Directories between `root` (exclusive) and `dir` (inclusive) that do not
/// exist yet, deepest first.
fn missing_ancestors(dir: &Path, root: &Path) -> Vec<PathBuf> {
    dir.ancestors()
        .take_while(|p| *p != root)
        .filter(|p| !p.exists())
        .map(Path::to_path_buf)
        .collect()
}

fn remove_created_dirs(dirs: &[PathBuf]) {
    let mut dirs = dirs.to_vec();
    // Deepest first; remove_dir only succeeds on empty directories.
    dirs.sort_by_key(|d| std::cmp::Reverse(d.components().count()));
    dirs.dedup();
    for dir in dirs {
        let _ = fs::remove_dir(&dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requested(package: &str, file_name: &str, content: &str) -> (String, GeneratedArtifact) {
        (
            "gen".to_string(),
            GeneratedArtifact::new(package, file_name, content),
        )
    }

    #[test]
    fn test_write_all_creates_package_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("generated");

        let dir = OutputDir::acquire(&out).unwrap();
        let written = dir
            .write_all(&[
                requested("com.example", "A.kt", "class A\n"),
                requested("", "B.kt", "class B\n"),
            ])
            .unwrap();
        drop(dir);

        assert_eq!(written.len(), 2);
        assert_eq!(written[0].path, "com/example/A.kt");
        assert_eq!(written[0].size, 8);
        assert_eq!(
            fs::read_to_string(out.join("com/example/A.kt")).unwrap(),
            "class A\n"
        );
        assert!(out.join("B.kt").exists());

        // Only the generated files live in the directory.
        let names: Vec<_> = walkdir::WalkDir::new(&out)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_failed_persist_rolls_back() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("generated");
        // A directory where the second file should go makes the move fail.
        fs::create_dir_all(out.join("q/B.kt")).unwrap();

        let dir = OutputDir::acquire(&out).unwrap();
        let err = dir
            .write_all(&[
                requested("p", "A.kt", "class A\n"),
                requested("q", "B.kt", "class B\n"),
            ])
            .unwrap_err();

        assert!(matches!(err, RoundError::Io { .. }));
        assert!(!out.join("p/A.kt").exists());
        assert!(!out.join("p").exists());
    }

    #[test]
    fn test_failed_persist_restores_overwritten_file() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("generated");
        fs::create_dir_all(out.join("p")).unwrap();
        fs::write(out.join("p/A.kt"), "previous round contents").unwrap();
        fs::create_dir_all(out.join("q/B.kt")).unwrap();

        let dir = OutputDir::acquire(&out).unwrap();
        let err = dir
            .write_all(&[
                requested("p", "A.kt", "NEW"),
                requested("q", "B.kt", "class B\n"),
            ])
            .unwrap_err();

        assert!(matches!(err, RoundError::Io { .. }));
        assert_eq!(
            fs::read_to_string(out.join("p/A.kt")).unwrap(),
            "previous round contents"
        );
        // No backup or staging files are left behind.
        let names: Vec<_> = fs::read_dir(out.join("p"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["A.kt"]);
    }

    #[test]
    fn test_overwrite_discards_backup() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("generated");
        fs::create_dir_all(out.join("p")).unwrap();
        fs::write(out.join("p/A.kt"), "old").unwrap();

        let dir = OutputDir::acquire(&out).unwrap();
        dir.write_all(&[requested("p", "A.kt", "new")]).unwrap();

        assert_eq!(fs::read_to_string(out.join("p/A.kt")).unwrap(), "new");
        assert_eq!(fs::read_dir(out.join("p")).unwrap().count(), 1);
    }

    #[test]
    fn test_acquire_fails_when_path_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();

        let err = OutputDir::acquire(&file).err().unwrap();
        assert!(matches!(
            err,
            ConfigurationError::UnwritableOutputDirectory { .. }
        ));
    }

    #[test]
    fn test_lock_released_on_drop() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("generated");

        let first = OutputDir::acquire(&out).unwrap();
        drop(first);
        // Would block forever if the first lock were still held.
        let second = OutputDir::acquire(&out).unwrap();
        assert!(second.root().ends_with("generated"));
    }
}
