//! Version markers and the update check.
//!
//! The installer tracks two independent artifacts — the content packs and
//! its own executable — each with its own plain-text marker file under the
//! data root. A marker holds the last successfully downloaded version
//! string and nothing else; a missing or unreadable marker reads as
//! `"0.0.0"`.
//!
//! Update detection is an exact string comparison between the stored
//! marker and the fetched release tag. There is deliberately no semantic
//! version ordering: release tags are opaque identifiers, and publishing a
//! different tag — even an older one — triggers a reinstall.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::config::InstallerConfig;
use crate::constants::DEFAULT_VERSION;
use crate::release::{Release, ReleaseClient};

/// Which artifact a version marker tracks.
///
/// The two tracks persist to different filenames so they can never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionTrack {
    /// The installed content packs.
    Content,
    /// The installer executable itself.
    Installer,
}

/// Reads and writes the per-track version marker files.
///
/// A marker is read once at the start of an update check and written once
/// after a successful download; there is no other lifecycle.
pub struct MarkerStore {
    data_root: PathBuf,
}

impl MarkerStore {
    /// Create a store rooted at the configuration's data directory.
    #[must_use]
    pub fn new(config: &InstallerConfig) -> Self {
        Self { data_root: config.data_root().to_path_buf() }
    }

    /// Path of the marker file for a track.
    #[must_use]
    pub fn marker_path(&self, track: VersionTrack) -> PathBuf {
        self.data_root.join(track.marker_file_name())
    }

    /// Load a track's recorded version.
    ///
    /// A missing, unreadable, or empty marker reads as
    /// [`DEFAULT_VERSION`] — the states are deliberately indistinguishable.
    pub async fn load(&self, track: VersionTrack) -> String {
        let path = self.marker_path(track);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                let version = contents.trim();
                if version.is_empty() {
                    DEFAULT_VERSION.to_string()
                } else {
                    version.to_string()
                }
            }
            Err(error) => {
                debug!(path = %path.display(), %error, "marker unreadable, using default");
                DEFAULT_VERSION.to_string()
            }
        }
    }

    /// Persist a track's version string.
    pub async fn save(&self, track: VersionTrack, version: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.data_root).await.with_context(|| {
            format!("Failed to create data directory: {}", self.data_root.display())
        })?;

        let path = self.marker_path(track);
        tokio::fs::write(&path, version)
            .await
            .with_context(|| format!("Failed to write version marker: {}", path.display()))?;
        Ok(())
    }
}

impl VersionTrack {
    /// Marker filename for this track.
    #[must_use]
    pub const fn marker_file_name(self) -> &'static str {
        match self {
            Self::Content => crate::constants::CONTENT_MARKER_FILE,
            Self::Installer => crate::constants::INSTALLER_MARKER_FILE,
        }
    }
}

/// Outcome of an update check.
#[derive(Debug, Clone)]
pub struct UpdateCheck {
    /// Whether the fetched tag differs from the stored marker.
    pub update_needed: bool,
    /// The resolved version: the fetched tag when an update is needed, the
    /// stored value when not, empty when the check failed.
    pub version: String,
    /// The fetched release, when the endpoint answered.
    pub release: Option<Release>,
}

impl UpdateCheck {
    /// The "check failed" outcome: no update, empty version, no release.
    #[must_use]
    pub fn unavailable() -> Self {
        Self { update_needed: false, version: String::new(), release: None }
    }

    /// Compare a stored marker against a fetched release.
    #[must_use]
    pub fn from_release(stored: &str, release: Release) -> Self {
        if release.tag_name == stored {
            Self { update_needed: false, version: stored.to_string(), release: Some(release) }
        } else {
            let version = release.tag_name.clone();
            Self { update_needed: true, version, release: Some(release) }
        }
    }
}

/// Check whether `repo` has published a release whose tag differs from the
/// track's stored marker.
///
/// Network or parse failures are not errors here: they log a warning and
/// yield [`UpdateCheck::unavailable`], which callers treat as "nothing to
/// do". A run never crashes because the releases endpoint was unreachable.
pub async fn check_update(
    client: &ReleaseClient,
    store: &MarkerStore,
    repo: &str,
    track: VersionTrack,
) -> UpdateCheck {
    println!("{}", "Checking latest version...".cyan());

    let release = match client.latest_release(repo).await {
        Ok(release) => release,
        Err(error) => {
            warn!(repo, "update check failed: {error:#}");
            println!("{}", format!("Could not check for updates: {error:#}").yellow());
            return UpdateCheck::unavailable();
        }
    };

    let stored = store.load(track).await;
    debug!(stored = %stored, fetched = %release.tag_name, "comparing versions");

    UpdateCheck::from_release(&stored, release)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(temp: &TempDir) -> MarkerStore {
        let config = InstallerConfig::with_user_data_dir(temp.path());
        MarkerStore::new(&config)
    }

    fn release(tag: &str) -> Release {
        Release { tag_name: tag.to_string(), assets: Vec::new() }
    }

    #[tokio::test]
    async fn missing_marker_reads_as_default() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        assert_eq!(store.load(VersionTrack::Content).await, DEFAULT_VERSION);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.save(VersionTrack::Content, "v1.2.3").await.unwrap();
        assert_eq!(store.load(VersionTrack::Content).await, "v1.2.3");
    }

    #[tokio::test]
    async fn tracks_do_not_collide() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.save(VersionTrack::Content, "v1.0.0").await.unwrap();
        store.save(VersionTrack::Installer, "v9.9.9").await.unwrap();

        assert_eq!(store.load(VersionTrack::Content).await, "v1.0.0");
        assert_eq!(store.load(VersionTrack::Installer).await, "v9.9.9");
        assert_ne!(
            store.marker_path(VersionTrack::Content),
            store.marker_path(VersionTrack::Installer)
        );
    }

    #[tokio::test]
    async fn whitespace_only_marker_reads_as_default() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        store.save(VersionTrack::Content, "  \n").await.unwrap();
        assert_eq!(store.load(VersionTrack::Content).await, DEFAULT_VERSION);
    }

    #[test]
    fn differing_tag_means_update_needed() {
        let check = UpdateCheck::from_release("v1.0.0", release("v1.1.0"));
        assert!(check.update_needed);
        assert_eq!(check.version, "v1.1.0");
    }

    #[test]
    fn equal_tag_means_no_update() {
        let check = UpdateCheck::from_release("v1.0.0", release("v1.0.0"));
        assert!(!check.update_needed);
        assert_eq!(check.version, "v1.0.0");
    }

    #[test]
    fn comparison_is_exact_not_ordered() {
        // A tag "older" than the marker still counts as an update; tags are
        // opaque strings, not ordered versions.
        let check = UpdateCheck::from_release("v2.0.0", release("v1.0.0"));
        assert!(check.update_needed);
        assert_eq!(check.version, "v1.0.0");
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_unavailable() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let client = ReleaseClient::with_api_root("http://127.0.0.1:9").unwrap();

        let check = check_update(&client, &store, "owner/repo", VersionTrack::Content).await;
        assert!(!check.update_needed);
        assert!(check.version.is_empty());
        assert!(check.release.is_none());
    }
}
