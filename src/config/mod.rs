//! Installer configuration.
//!
//! All paths and repository coordinates the installer touches are computed
//! once at startup into an [`InstallerConfig`] and threaded through every
//! function that needs them. Nothing else in the crate reads the platform
//! data directory or composes data-root paths on its own — that keeps the
//! path layout in one place and lets tests point a whole run at a
//! temporary directory.

use std::path::{Path, PathBuf};

use crate::constants::{
    APP_DIR_NAME, CONTENT_REPO, EXTRACT_DIR_NAME, INSTALLER_REPO, PURGE_DIR_NAME,
    STAGING_DIR_NAME, TARGET_DIR_NAME,
};
use crate::utils::fs::locate_dir;

/// Resolved paths and repository coordinates for one run.
///
/// # Layout
///
/// ```text
/// <user data dir>/                    platform data root (dirs::data_dir)
/// ├── packup/                         data_root()
/// │   ├── staging/                    staging_dir(), per-run, removed after use
/// │   ├── content/                    extract_dir(), archive unpack area
/// │   ├── content.version             content marker
/// │   └── installer.version           installer marker
/// └── PackHost/                       discovered target directory
///     └── content/                    purged subtree, then repopulated
/// ```
///
/// When the platform provides no data directory, the data root falls back
/// to a relative `packup` directory under the working directory.
#[derive(Debug, Clone)]
pub struct InstallerConfig {
    user_data_dir: PathBuf,
    data_root: PathBuf,
    target_dir_name: String,
    purge_dir_name: String,
    content_repo: String,
    installer_repo: String,
}

impl InstallerConfig {
    /// Build the configuration from the platform's per-user data directory.
    #[must_use]
    pub fn new() -> Self {
        let user_data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_user_data_dir(&user_data_dir)
    }

    /// Build the configuration against an explicit user data directory.
    ///
    /// This is the seam tests use to run the installer entirely inside a
    /// temporary directory.
    #[must_use]
    pub fn with_user_data_dir(user_data_dir: &Path) -> Self {
        Self {
            user_data_dir: user_data_dir.to_path_buf(),
            data_root: user_data_dir.join(APP_DIR_NAME),
            target_dir_name: TARGET_DIR_NAME.to_string(),
            purge_dir_name: PURGE_DIR_NAME.to_string(),
            content_repo: CONTENT_REPO.to_string(),
            installer_repo: INSTALLER_REPO.to_string(),
        }
    }

    /// packup's own data directory.
    #[must_use]
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// The per-run staging directory for downloaded assets.
    #[must_use]
    pub fn staging_dir(&self) -> PathBuf {
        self.data_root.join(STAGING_DIR_NAME)
    }

    /// The directory archives are extracted into before the copy.
    #[must_use]
    pub fn extract_dir(&self) -> PathBuf {
        self.data_root.join(EXTRACT_DIR_NAME)
    }

    /// Repository coordinate serving content-pack releases.
    #[must_use]
    pub fn content_repo(&self) -> &str {
        &self.content_repo
    }

    /// Repository coordinate serving installer releases.
    #[must_use]
    pub fn installer_repo(&self) -> &str {
        &self.installer_repo
    }

    /// The subtree purged under the target directory before a copy.
    #[must_use]
    pub fn purge_dir(&self, target: &Path) -> PathBuf {
        target.join(&self.purge_dir_name)
    }

    /// Discover the target application directory under the user data area.
    ///
    /// # Errors
    ///
    /// [`crate::core::PackupError::TargetNotFound`] when no directory with
    /// the configured name exists there.
    pub fn locate_target(&self) -> anyhow::Result<PathBuf> {
        locate_dir(&self.user_data_dir, &self.target_dir_name)
    }
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn paths_derive_from_the_user_data_dir() {
        let temp = TempDir::new().unwrap();
        let config = InstallerConfig::with_user_data_dir(temp.path());

        assert_eq!(config.data_root(), temp.path().join("packup"));
        assert_eq!(config.staging_dir(), temp.path().join("packup/staging"));
        assert_eq!(config.extract_dir(), temp.path().join("packup/content"));
    }

    #[test]
    fn staging_and_extract_dirs_are_distinct() {
        let temp = TempDir::new().unwrap();
        let config = InstallerConfig::with_user_data_dir(temp.path());
        assert_ne!(config.staging_dir(), config.extract_dir());
    }

    #[test]
    fn locate_target_requires_the_directory_to_exist() {
        let temp = TempDir::new().unwrap();
        let config = InstallerConfig::with_user_data_dir(temp.path());
        assert!(config.locate_target().is_err());

        std::fs::create_dir(temp.path().join("PackHost")).unwrap();
        assert_eq!(config.locate_target().unwrap(), temp.path().join("PackHost"));
    }

    #[test]
    fn purge_dir_sits_under_the_target() {
        let temp = TempDir::new().unwrap();
        let config = InstallerConfig::with_user_data_dir(temp.path());
        let target = temp.path().join("PackHost");
        assert_eq!(config.purge_dir(&target), target.join("content"));
    }
}
