//! Global constants used throughout the packup codebase.
//!
//! This module contains the fixed names and coordinates that the rest of
//! the installer derives its paths and requests from. Defining them
//! centrally keeps the magic strings discoverable and makes sure the two
//! version-marker tracks can never silently collide.

use std::time::Duration;

/// Directory name for packup's own per-user data under the platform data root.
///
/// All persistent state (version markers, staging area, extraction area)
/// lives below this directory.
pub const APP_DIR_NAME: &str = "packup";

/// Name of the per-run staging directory under the data root.
///
/// Created before a download and removed unconditionally at the end of a
/// run. Cleanup is best-effort; a crashed run may leave it behind, in which
/// case the next run recreates it in place.
pub const STAGING_DIR_NAME: &str = "staging";

/// Name of the extraction directory under the data root.
///
/// Downloaded archives are unpacked here before being mirrored into the
/// target application directory.
pub const EXTRACT_DIR_NAME: &str = "content";

/// Marker filename for the content-pack track.
pub const CONTENT_MARKER_FILE: &str = "content.version";

/// Marker filename for the installer's own track.
///
/// Must differ from [`CONTENT_MARKER_FILE`]; the two tracks record
/// independent version strings.
pub const INSTALLER_MARKER_FILE: &str = "installer.version";

/// Version reported when a marker file is missing or unreadable.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Name of the application directory searched for under the user data area.
///
/// Content packs are installed into this directory once discovered.
pub const TARGET_DIR_NAME: &str = "PackHost";

/// Name of the subtree purged under the target directory before a copy.
pub const PURGE_DIR_NAME: &str = "content";

/// GitHub repository coordinate serving content-pack releases.
pub const CONTENT_REPO: &str = "packup-project/starter-packs";

/// GitHub repository coordinate serving installer releases.
pub const INSTALLER_REPO: &str = "packup-project/packup";

/// Root of the GitHub REST API.
pub const GITHUB_API_ROOT: &str = "https://api.github.com";

/// User agent sent on every outbound request. GitHub rejects anonymous
/// requests without one.
pub const USER_AGENT: &str = concat!("packup/", env!("CARGO_PKG_VERSION"));

/// File name of the staged updater helper binary.
///
/// The helper is a copy of the downloaded installer placed next to the
/// current executable, launched to overwrite it once this process exits.
#[cfg(windows)]
pub const UPDATER_FILE_NAME: &str = "packup-updater.exe";
/// File name of the staged updater helper binary.
///
/// The helper is a copy of the downloaded installer placed next to the
/// current executable, launched to overwrite it once this process exits.
#[cfg(not(windows))]
pub const UPDATER_FILE_NAME: &str = "packup-updater";

/// Delay the updater helper waits before overwriting its target (500ms).
///
/// Gives the launching process time to exit so the target executable is no
/// longer running when the copy happens.
pub fn helper_settle_delay() -> Duration {
    Duration::from_millis(500)
}
