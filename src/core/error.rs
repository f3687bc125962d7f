//! Error handling for packup.
//!
//! The installer distinguishes a small set of failure classes so the
//! orchestrators can report each step precisely:
//!
//! - **Network**: fetching release metadata or downloading an asset failed
//! - **Parse**: the release document did not match the expected shape
//! - **Path traversal**: an archive entry resolved outside the extraction
//!   root — the one error class that always fails its whole step, since a
//!   single hostile entry marks the archive untrustworthy
//! - **Target discovery**: the application directory was not found
//! - **Missing staged artifact**: a step depended on output an earlier
//!   failed step never produced
//!
//! Almost nothing here is fatal to the process. Orchestration applies a
//! per-step policy (see [`crate::core::steps`]); the typed variants exist so
//! steps can fail with a message that names what actually went wrong rather
//! than a bare I/O error. Plain filesystem failures travel as
//! `anyhow::Result` with the failing path attached via `.with_context()`.

use colored::Colorize;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for packup operations.
///
/// Each variant carries enough context to produce a self-explanatory
/// console line without the caller re-stating paths or URLs.
#[derive(Error, Debug)]
pub enum PackupError {
    /// Fetching release metadata from the releases endpoint failed.
    #[error("Failed to fetch release metadata from {url}")]
    ReleaseFetch {
        /// The URL that was queried.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The release document could not be parsed into the expected shape.
    #[error("Failed to parse release metadata from {url}")]
    ReleaseParse {
        /// The URL that was queried.
        url: String,
        /// The underlying decode error.
        #[source]
        source: reqwest::Error,
    },

    /// Downloading an asset's binary content failed.
    #[error("Failed to download asset from {url}")]
    AssetDownload {
        /// The asset URL.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// An archive entry would be written outside the extraction directory.
    ///
    /// Extraction fails as a whole when this is raised; the offending entry
    /// is never skipped.
    #[error("Archive entry '{entry}' escapes the extraction directory")]
    PathTraversal {
        /// The raw entry name from the archive.
        entry: String,
    },

    /// The target application directory was not found under the user data
    /// area.
    #[error("Target directory '{name}' not found under {searched}")]
    TargetNotFound {
        /// The directory name that was searched for.
        name: String,
        /// The directory that was searched.
        searched: PathBuf,
    },

    /// A step needed a staged artifact that an earlier step failed to
    /// produce.
    #[error("No staged artifact available: {reason}")]
    MissingStagedArtifact {
        /// Why the artifact is unavailable.
        reason: String,
    },
}

/// Print a fatal error with its cause chain and red highlighting.
///
/// Used by `main` for the few failures that abort the process (argument
/// handling aside, orchestration errors are logged per step and never reach
/// this).
pub fn display_fatal(error: &anyhow::Error) {
    eprintln!("{} {error}", "error:".red().bold());
    for cause in error.chain().skip(1) {
        eprintln!("  {} {cause}", "caused by:".red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_traversal_names_the_entry() {
        let err = PackupError::PathTraversal { entry: "../evil.dll".to_string() };
        assert!(err.to_string().contains("../evil.dll"));
    }

    #[test]
    fn target_not_found_names_both_sides() {
        let err = PackupError::TargetNotFound {
            name: "PackHost".to_string(),
            searched: PathBuf::from("/data"),
        };
        let message = err.to_string();
        assert!(message.contains("PackHost"));
        assert!(message.contains("/data"));
    }
}
