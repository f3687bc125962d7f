//! File system operations for the installer.
//!
//! These helpers cover the installer's three needs: creating and removing
//! directory trees around a run, mirroring an extracted tree into the
//! target directory, and the lexical path handling the archive extractor
//! uses for its traversal guard.
//!
//! All functions return `anyhow::Result` with the failing path attached as
//! context, so orchestration steps can surface them verbatim.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::core::PackupError;

/// Create a directory and all missing parents.
///
/// Succeeds if the directory already exists.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    Ok(())
}

/// Recursively remove a directory tree.
///
/// Removing a path that does not exist is not an error; this is used for
/// best-effort cleanup where the tree may never have been created.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Normalize a path by resolving `.` and `..` components lexically.
///
/// No filesystem access happens: symlinks are not resolved and the path
/// does not need to exist. A `..` at the root of the path removes the
/// preceding component, so a path consisting only of parent components
/// normalizes to empty — which is exactly what the traversal guard wants.
///
/// # Examples
///
/// ```
/// use packup::utils::fs::normalize_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(normalize_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                components.pop();
            }
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Check whether `candidate`, resolved against `base`, stays within `base`.
///
/// This is the guard behind the archive extractor's path-traversal
/// rejection: both sides are normalized lexically before the prefix
/// comparison, so `../` sequences and absolute entry names are caught
/// regardless of how they are spelled.
#[must_use]
pub fn is_safe_path(base: &Path, candidate: &Path) -> bool {
    let base = normalize_path(base);
    let resolved = normalize_path(&base.join(candidate));
    resolved.starts_with(&base)
}

/// Mirror a directory tree into a destination directory.
///
/// Directories are created as encountered, file bytes are streamed via
/// [`fs::copy`], and each file's permission bits carry over to the
/// destination. The walk visits entries in deterministic lexical order, so
/// two copies of the same tree always touch files in the same sequence.
/// Symlinks and other special file types are skipped.
///
/// # Errors
///
/// The first I/O error aborts the remaining walk and is returned to the
/// caller. Files already copied stay in place; there is no rollback.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    ensure_dir(dst)?;

    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to walk directory: {}", src.display()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("Walked outside source tree: {}", entry.path().display()))?;
        let dest = dst.join(relative);

        if entry.file_type().is_dir() {
            ensure_dir(&dest)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &dest).with_context(|| {
                format!(
                    "Failed to copy file from {} to {}",
                    entry.path().display(),
                    dest.display()
                )
            })?;
        } else {
            debug!(path = %entry.path().display(), "skipping special file during copy");
        }
    }

    Ok(())
}

/// Look up a directory called `name` directly under `parent`.
///
/// Returns [`PackupError::TargetNotFound`] when the entry is missing or is
/// not a directory. Used to discover the target application directory
/// under the user data area.
pub fn locate_dir(parent: &Path, name: &str) -> Result<PathBuf> {
    let candidate = parent.join(name);
    if candidate.is_dir() {
        return Ok(candidate);
    }

    Err(PackupError::TargetNotFound { name: name.to_string(), searched: parent.to_path_buf() }
        .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ensure_dir_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a/b/c");
        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn remove_dir_all_tolerates_missing_path() {
        let temp = TempDir::new().unwrap();
        remove_dir_all(&temp.path().join("never-created")).unwrap();
    }

    #[test]
    fn normalize_resolves_dot_and_dotdot() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_path(Path::new("a/b/../../d")), PathBuf::from("d"));
    }

    #[test]
    fn normalize_collapses_escaping_parents_to_empty() {
        assert_eq!(normalize_path(Path::new("../..")), PathBuf::new());
    }

    #[test]
    fn safe_path_accepts_nested_and_rejects_escapes() {
        let base = Path::new("/data/packup/content");
        assert!(is_safe_path(base, Path::new("packs/alpha.txt")));
        assert!(is_safe_path(base, Path::new("./packs/beta.txt")));
        assert!(!is_safe_path(base, Path::new("../../../etc/passwd")));
        assert!(!is_safe_path(base, Path::new("/etc/passwd")));
    }

    #[test]
    fn copy_tree_round_trips_structure_and_content() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();

        fs::create_dir_all(src.path().join("nested/deep")).unwrap();
        fs::write(src.path().join("top.txt"), b"top").unwrap();
        fs::write(src.path().join("nested/mid.txt"), b"mid").unwrap();
        fs::write(src.path().join("nested/deep/leaf.txt"), b"leaf").unwrap();

        copy_tree(src.path(), dst.path()).unwrap();

        let collect = |root: &Path| {
            let mut paths: Vec<PathBuf> = WalkDir::new(root)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
                .collect();
            paths.sort();
            paths
        };

        assert_eq!(collect(src.path()), collect(dst.path()));
        assert_eq!(fs::read(dst.path().join("top.txt")).unwrap(), b"top");
        assert_eq!(fs::read(dst.path().join("nested/deep/leaf.txt")).unwrap(), b"leaf");
    }

    #[cfg(unix)]
    #[test]
    fn copy_tree_preserves_permission_bits() {
        use std::os::unix::fs::PermissionsExt;

        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();

        let script = src.path().join("run.sh");
        fs::write(&script, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        copy_tree(src.path(), dst.path()).unwrap();

        let mode = fs::metadata(dst.path().join("run.sh")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn locate_dir_finds_existing_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("PackHost")).unwrap();

        let found = locate_dir(temp.path(), "PackHost").unwrap();
        assert_eq!(found, temp.path().join("PackHost"));
    }

    #[test]
    fn locate_dir_rejects_missing_and_non_directories() {
        let temp = TempDir::new().unwrap();
        assert!(locate_dir(temp.path(), "PackHost").is_err());

        fs::write(temp.path().join("PackHost"), b"file, not dir").unwrap();
        assert!(locate_dir(temp.path(), "PackHost").is_err());
    }
}
