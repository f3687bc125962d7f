//! Content-pack install orchestration.
//!
//! The install is a linear plan driven through [`StepRunner`]:
//!
//! 1. version check against the content repository
//! 2. asset retrieval into the staging directory (+ marker write)
//! 3. target directory discovery
//! 4. purge of the target's content subtree
//! 5. archive extraction
//! 6. copy of the extracted tree into the target
//! 7. staging cleanup
//!
//! Every install step carries the `Continue` failure policy: a failed step
//! is logged and the plan keeps going, with steps that structurally depend
//! on the failed step's output failing and logging on their own. The run
//! is best-effort, not transactional — nothing is rolled back.

use anyhow::{Result, anyhow};
use colored::Colorize;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::InstallerConfig;
use crate::core::{PackupError, Step, StepReport, StepRunner};
use crate::release::{Release, ReleaseClient};
use crate::utils::{copy_tree, ensure_dir, extract_zip, remove_dir_all};
use crate::version::{MarkerStore, VersionTrack, check_update};

/// Summary of one install run.
#[derive(Debug)]
pub struct InstallOutcome {
    /// The resolved version string (empty when the check failed).
    pub version: String,
    /// Whether the install steps ran at all, as opposed to an up-to-date
    /// early return.
    pub attempted: bool,
    /// Per-step reports in plan order.
    pub reports: Vec<StepReport>,
}

/// Download a release's first asset into the staging directory and record
/// its version.
///
/// Shared by the content install and the self-update: both stage exactly
/// one artifact and persist the new version string for their track once
/// the download lands.
///
/// Returns the staged file's path, or `Ok(None)` — with a logged warning
/// and the marker left untouched — when there is no release or the release
/// has no assets.
pub async fn fetch_asset(
    client: &ReleaseClient,
    config: &InstallerConfig,
    store: &MarkerStore,
    track: VersionTrack,
    release: Option<&Release>,
    version: &str,
) -> Result<Option<PathBuf>> {
    ensure_dir(&config.staging_dir())?;

    let Some(release) = release else {
        warn!("no release available to download");
        println!("{}", "No release available to download.".yellow());
        return Ok(None);
    };

    let Some(asset) = release.primary_asset() else {
        warn!(tag = %release.tag_name, "release has no assets");
        println!("{}", "No assets found for the latest release.".yellow());
        return Ok(None);
    };

    let dest = config.staging_dir().join(asset.file_name());
    client.download_asset(&asset.browser_download_url, &dest).await?;

    store.save(track, version).await?;
    info!(version, dest = %dest.display(), "asset staged");
    println!("{}", format!("Package downloaded for version: {version}").green());

    Ok(Some(dest))
}

/// Run the content-pack install.
///
/// When the stored marker already matches the published tag and `force` is
/// not set, reports the current version and returns without touching
/// anything. Otherwise drives the full step plan; failures are logged per
/// step and reflected in the returned [`InstallOutcome`], never raised.
pub async fn run_install(
    config: &InstallerConfig,
    client: &ReleaseClient,
    force: bool,
) -> InstallOutcome {
    let store = MarkerStore::new(config);
    let mut runner = StepRunner::new();

    let check = check_update(client, &store, config.content_repo(), VersionTrack::Content).await;
    runner.record_completed(Step::CheckVersion);

    if force {
        println!("{}", "Forcing update...".yellow());
    } else if !check.update_needed {
        if check.version.is_empty() {
            println!("{}", "No release information available; nothing to do.".yellow());
        } else {
            println!(
                "{}",
                format!("You are using the latest version: {}", check.version).green()
            );
        }
        return InstallOutcome {
            version: check.version,
            attempted: false,
            reports: runner.into_reports(),
        };
    } else {
        println!("{}", format!("A newer version is available: {}", check.version).green());
    }

    let staged = runner
        .run(
            Step::FetchAsset,
            fetch_asset(
                client,
                config,
                &store,
                VersionTrack::Content,
                check.release.as_ref(),
                &check.version,
            ),
        )
        .await
        .flatten();

    let target = runner.run(Step::LocateTarget, async { config.locate_target() }).await;

    runner
        .run(Step::PurgeContent, async {
            let target = target
                .as_deref()
                .ok_or_else(|| anyhow!("target directory was not located"))?;
            remove_dir_all(&config.purge_dir(target))
        })
        .await;

    runner
        .run(Step::ExtractArchive, async {
            let archive = staged.as_deref().ok_or_else(|| PackupError::MissingStagedArtifact {
                reason: "asset retrieval staged no archive".to_string(),
            })?;
            extract_zip(archive, &config.extract_dir())
        })
        .await;

    runner
        .run(Step::CopyContent, async {
            let target = target
                .as_deref()
                .ok_or_else(|| anyhow!("target directory was not located"))?;
            copy_tree(&config.extract_dir(), target)
        })
        .await;

    runner
        .run(Step::CleanupStaging, async { remove_dir_all(&config.staging_dir()) })
        .await;

    InstallOutcome { version: check.version, attempted: true, reports: runner.into_reports() }
}
