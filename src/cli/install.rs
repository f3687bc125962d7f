//! The `install` command.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::config::InstallerConfig;
use crate::core::StepStatus;
use crate::installer::run_install;
use crate::release::ReleaseClient;

/// Arguments for the content-pack install.
///
/// The command itself carries no options; force and verbosity are global
/// flags on the root parser.
#[derive(Parser, Debug, Default)]
pub struct InstallCommand {}

impl InstallCommand {
    /// Run the install plan and summarize the result.
    ///
    /// Step failures have already been logged individually by the
    /// orchestrator; this only decides the closing line. The command
    /// returns `Ok` regardless of step failures — the install is
    /// best-effort by design.
    pub async fn execute(self, config: &InstallerConfig, force: bool) -> Result<()> {
        let client = ReleaseClient::new()?;
        let outcome = run_install(config, &client, force).await;

        if outcome.attempted {
            let failed =
                outcome.reports.iter().filter(|r| r.status == StepStatus::Failed).count();
            if failed == 0 {
                println!(
                    "{}",
                    format!("Content packs installed for version: {}", outcome.version).green()
                );
            } else {
                println!(
                    "{}",
                    format!("Install finished with {failed} failed step(s); see messages above.")
                        .yellow()
                );
            }
        }

        Ok(())
    }
}
