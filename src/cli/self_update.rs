//! The `self-update` command and the hidden helper completion signal.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use crate::config::InstallerConfig;
use crate::release::ReleaseClient;
use crate::upgrade;

/// Arguments for updating the installer executable itself.
#[derive(Parser, Debug, Default)]
pub struct SelfUpdateCommand {}

impl SelfUpdateCommand {
    /// Run the self-update plan.
    ///
    /// When the updater helper has been launched this process exits
    /// immediately — the helper is waiting for the executable to stop
    /// running before overwriting it.
    pub async fn execute(self, config: &InstallerConfig, force: bool) -> Result<()> {
        let client = ReleaseClient::new()?;
        let outcome = upgrade::run_self_update(config, &client, force).await;

        if outcome.helper_launched {
            std::process::exit(0);
        }

        // More than the version check in the reports means the plan ran
        // and stopped short of the hand-off.
        if outcome.reports.len() > 1 {
            println!(
                "{}",
                "Self-update did not complete; see messages above.".yellow()
            );
        }

        Ok(())
    }
}

/// Arguments for the hidden completion signal.
///
/// The staged helper is launched with this subcommand; users never invoke
/// it. The explicit `--target` argument tells the helper which executable
/// to overwrite, so the decision does not rest on inspecting the helper's
/// own file name.
#[derive(Parser, Debug)]
pub struct FinishSelfUpdateCommand {
    /// Path of the executable to overwrite with this binary.
    #[arg(long, value_name = "PATH")]
    target: PathBuf,
}

impl FinishSelfUpdateCommand {
    /// Complete a self-update by copying this executable over the target.
    pub async fn execute(self) -> Result<()> {
        upgrade::finish_self_update(&self.target).await
    }
}
