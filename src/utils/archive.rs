//! Safe zip extraction.
//!
//! Downloaded content packs are plain zip archives, but they come from the
//! network and are treated as untrusted input: every entry's destination is
//! normalized and checked against the extraction root before any bytes are
//! written. One entry resolving outside the root fails the whole
//! extraction — a hostile entry means the archive cannot be trusted, so
//! skipping it and continuing is not an option.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

use crate::core::PackupError;
use crate::utils::fs::{ensure_dir, normalize_path};

/// Extract every entry of a zip archive into `dest_root`.
///
/// Directory entries create directories; file entries create missing
/// parents, then stream their contents. Unix permission bits recorded in
/// the archive are applied to extracted files. Handles for each entry are
/// closed before the next entry is processed, whether or not the entry
/// succeeded.
///
/// # Errors
///
/// - [`PackupError::PathTraversal`] when an entry's normalized destination
///   does not remain under `dest_root`; nothing is written for that entry
///   and the extraction fails as a whole
/// - I/O errors opening the archive, creating directories, or writing
///   entry contents
pub fn extract_zip(archive_path: &Path, dest_root: &Path) -> Result<()> {
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("Failed to read archive: {}", archive_path.display()))?;

    ensure_dir(dest_root)?;
    let root = normalize_path(dest_root);

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .with_context(|| format!("Failed to read archive entry #{index}"))?;
        let entry_name = entry.name().to_owned();

        // Reject traversal before touching the filesystem for this entry.
        let destination = normalize_path(&root.join(&entry_name));
        if !destination.starts_with(&root) {
            return Err(PackupError::PathTraversal { entry: entry_name }.into());
        }

        if entry.is_dir() {
            ensure_dir(&destination)?;
            continue;
        }

        if let Some(parent) = destination.parent() {
            ensure_dir(parent)?;
        }

        let mut output = File::create(&destination)
            .with_context(|| format!("Failed to create file: {}", destination.display()))?;
        io::copy(&mut entry, &mut output)
            .with_context(|| format!("Failed to extract entry '{entry_name}'"))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&destination, fs::Permissions::from_mode(mode)).with_context(
                || format!("Failed to set permissions on {}", destination.display()),
            )?;
        }

        debug!(entry = entry_name, "extracted");
    }

    Ok(())
}
