//! Self-update for the packup binary.
//!
//! A running executable cannot reliably overwrite itself in place, so the
//! update happens in two processes:
//!
//! 1. This process checks the installer repository, stages the downloaded
//!    binary as `packup-updater` next to the current executable, launches
//!    that helper detached with the explicit completion signal
//!    (`finish-self-update --target <current-exe>`), and exits immediately.
//! 2. The helper waits briefly for this process to exit, copies its own
//!    executable over the target path, and exits. Running the helper a
//!    second time after the copy has happened is harmless.
//!
//! The hand-off is fire-and-forget: the launching process does not
//! supervise the helper. Any later normal invocation removes a leftover
//! helper binary before doing install work, closing the cycle.
//!
//! Unlike the content install, the hand-off steps carry the `Abort`
//! policy — without a staged helper there is nothing left worth doing.

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

use crate::config::InstallerConfig;
use crate::constants::{UPDATER_FILE_NAME, helper_settle_delay};
use crate::core::{PackupError, Step, StepReport, StepRunner};
use crate::installer::fetch_asset;
use crate::release::ReleaseClient;
use crate::utils::remove_dir_all;
use crate::version::{MarkerStore, VersionTrack, check_update};


/// Summary of one self-update run.
#[derive(Debug)]
pub struct SelfUpdateOutcome {
    /// Whether the helper was launched; when true the caller should exit
    /// so the helper can overwrite the executable.
    pub helper_launched: bool,
    /// The resolved version string (empty when the check failed).
    pub version: String,
    /// Per-step reports in plan order.
    pub reports: Vec<StepReport>,
}

/// Path of the updater helper next to an executable.
#[must_use]
pub fn helper_path_beside(executable: &Path) -> PathBuf {
    match executable.parent() {
        Some(dir) => dir.join(UPDATER_FILE_NAME),
        None => PathBuf::from(UPDATER_FILE_NAME),
    }
}

/// Copy the downloaded installer to the helper path and mark it
/// executable.
pub fn stage_helper(source: &Path, helper: &Path) -> Result<()> {
    fs::copy(source, helper).with_context(|| {
        format!("Failed to stage helper from {} to {}", source.display(), helper.display())
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut permissions = fs::metadata(helper)
            .with_context(|| format!("Failed to read helper metadata: {}", helper.display()))?
            .permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(helper, permissions)
            .with_context(|| format!("Failed to mark helper executable: {}", helper.display()))?;
    }

    Ok(())
}

/// Launch the staged helper detached with the completion signal.
///
/// The child is not waited on; the caller exits right after this returns
/// so the helper can overwrite the executable once the process is gone.
fn spawn_helper(helper: &Path, target: &Path) -> Result<()> {
    let mut command = Command::new(helper);
    command.arg("finish-self-update").arg("--target").arg(target);

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const DETACHED_PROCESS: u32 = 0x0000_0008;
        command.creation_flags(DETACHED_PROCESS);
    }

    command
        .spawn()
        .with_context(|| format!("Failed to launch updater helper: {}", helper.display()))?;

    info!(helper = %helper.display(), target = %target.display(), "helper launched");
    Ok(())
}

/// Copy `source` over `target`.
///
/// This is the helper's replacement step. Copying over an existing,
/// identical target succeeds, which is what makes a repeated completion
/// signal harmless. Copying a path over itself would truncate it, so that
/// case is a no-op.
pub fn replace_executable(source: &Path, target: &Path) -> Result<()> {
    if source == target {
        debug!(path = %source.display(), "source and target are the same file");
        return Ok(());
    }

    fs::copy(source, target).with_context(|| {
        format!("Failed to replace {} with {}", target.display(), source.display())
    })?;
    Ok(())
}

/// The helper side of the hand-off: settle, then overwrite the target with
/// this executable.
pub async fn finish_self_update(target: &Path) -> Result<()> {
    // Give the launching process time to exit before touching its file.
    tokio::time::sleep(helper_settle_delay()).await;

    let source = std::env::current_exe().context("Failed to resolve current executable")?;
    replace_executable(&source, target)?;

    info!(target = %target.display(), "executable replaced");
    Ok(())
}

/// Remove a leftover helper binary from a previous self-update cycle.
///
/// Called on every normal invocation before install work starts. Entirely
/// best-effort: a missing helper is the common case and removal failures
/// are only logged.
pub fn remove_stale_helper() {
    let Ok(current_exe) = std::env::current_exe() else {
        return;
    };

    let helper = helper_path_beside(&current_exe);
    if !helper.exists() {
        return;
    }

    match fs::remove_file(&helper) {
        Ok(()) => debug!(helper = %helper.display(), "removed stale updater helper"),
        Err(error) => warn!(helper = %helper.display(), %error, "could not remove stale helper"),
    }
}

/// Run the self-update.
///
/// Mirrors the content install's check/fetch flow against the installer
/// repository and marker track, then stages and launches the helper. When
/// `helper_launched` comes back true the process should exit immediately.
pub async fn run_self_update(
    config: &InstallerConfig,
    client: &ReleaseClient,
    force: bool,
) -> SelfUpdateOutcome {
    let store = MarkerStore::new(config);
    let mut runner = StepRunner::new();

    let check = check_update(client, &store, config.installer_repo(), VersionTrack::Installer).await;
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
        return SelfUpdateOutcome {
            helper_launched: false,
            version: check.version,
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
                VersionTrack::Installer,
                check.release.as_ref(),
                &check.version,
            ),
        )
        .await
        .flatten();

    let handoff = runner
        .run(Step::StageHelper, async {
            let staged = staged.as_deref().ok_or_else(|| PackupError::MissingStagedArtifact {
                reason: "asset retrieval staged no installer binary".to_string(),
            })?;
            let current_exe =
                std::env::current_exe().context("Failed to resolve current executable")?;
            let helper = helper_path_beside(&current_exe);
            stage_helper(staged, &helper)?;
            Ok((helper, current_exe))
        })
        .await;

    runner.run(Step::CleanupStaging, async { remove_dir_all(&config.staging_dir()) }).await;

    let launched = runner
        .run(Step::LaunchHelper, async {
            let (helper, current_exe) =
                handoff.as_ref().ok_or_else(|| anyhow!("no helper was staged"))?;
            spawn_helper(helper, current_exe)
        })
        .await
        .is_some();

    if launched {
        println!(
            "{}",
            "Update staged; restarting through the updater helper...".cyan()
        );
    }

    SelfUpdateOutcome {
        helper_launched: launched,
        version: check.version,
        reports: runner.into_reports(),
    }
}
