//! packup - a self-updating content-pack installer.
//!
//! packup keeps a PackHost installation's content packs in sync with
//! GitHub releases: it compares the latest published tag against a locally
//! persisted version marker, downloads the release's zip archive when the
//! tag differs, extracts it with path-traversal protection, and mirrors
//! the result into the target application directory. A second mode
//! replaces the installer executable itself through a staged updater
//! helper process.
//!
//! # Architecture
//!
//! The run is a linear plan of named steps with an explicit per-step
//! failure policy: content-install steps log failures and continue (a
//! partial run is reported, never rolled back), while the self-update
//! hand-off aborts once the helper cannot be staged or launched. All
//! paths derive from one [`config::InstallerConfig`] built at startup.
//!
//! # Core Modules
//!
//! - [`cli`] - argument parsing and command dispatch
//! - [`config`] - resolved paths and repository coordinates for one run
//! - [`core`] - error taxonomy and the step/policy machinery
//! - [`installer`] - the content-pack install orchestrator
//! - [`release`] - GitHub release metadata and asset downloads
//! - [`upgrade`] - self-update via the staged helper process
//! - [`utils`] - filesystem helpers and safe zip extraction
//! - [`version`] - version markers and the exact-string update check
//!
//! # Known Limitations
//!
//! Two simultaneous runs are not coordinated: they can race on the
//! version markers, the staging directory, and the target tree. Network
//! calls use reqwest's defaults with no retries, and every operation is
//! attempted exactly once per run.

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod installer;
pub mod release;
pub mod upgrade;
pub mod utils;
pub mod version;
