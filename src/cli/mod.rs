//! Command-line interface for packup.
//!
//! Three commands share one binary:
//!
//! - `install` - sync content packs with the latest published release.
//!   This is the default when no subcommand is given, so a bare `packup`
//!   run performs an install.
//! - `self-update` - replace the installer executable through the staged
//!   updater helper.
//! - `finish-self-update` - hidden completion signal the staged helper is
//!   launched with; never invoked by users directly.
//!
//! The force flag (`--force`/`-f`) is global so it works both as
//! `packup -f` and `packup install --force`. Verbosity flags feed the
//! tracing filter; user-facing progress goes to standard output
//! independently of them.
//!
//! Orchestration-level failures are logged per step and the process exits
//! 0; only argument errors and fatal setup failures (e.g. the HTTP client
//! not building) produce a nonzero exit.

mod install;
mod self_update;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::InstallerConfig;
use crate::upgrade;

/// Top-level CLI parser.
#[derive(Parser)]
#[command(
    name = "packup",
    about = "Keep PackHost content packs and the installer itself in sync with GitHub releases",
    version,
    author
)]
pub struct Cli {
    /// The subcommand to execute; defaults to `install`.
    #[command(subcommand)]
    command: Option<Commands>,

    /// Skip the version-equality check and reinstall even when the stored
    /// marker already matches the published tag.
    #[arg(short, long, global = true)]
    force: bool,

    /// Enable debug-level diagnostics.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Download and install the latest content-pack release.
    Install(install::InstallCommand),

    /// Update the packup executable itself.
    SelfUpdate(self_update::SelfUpdateCommand),

    /// Completion signal for the staged updater helper.
    #[command(hide = true)]
    FinishSelfUpdate(self_update::FinishSelfUpdateCommand),
}

impl Cli {
    /// Execute the parsed command.
    pub async fn execute(self) -> Result<()> {
        init_tracing(self.verbose, self.quiet);

        let config = InstallerConfig::new();
        let command = self
            .command
            .unwrap_or_else(|| Commands::Install(install::InstallCommand::default()));

        match command {
            Commands::Install(cmd) => {
                upgrade::remove_stale_helper();
                cmd.execute(&config, self.force).await
            }
            Commands::SelfUpdate(cmd) => {
                upgrade::remove_stale_helper();
                cmd.execute(&config, self.force).await
            }
            // The helper must not remove itself before it has run.
            Commands::FinishSelfUpdate(cmd) => cmd.execute().await,
        }
    }
}

/// Initialize the tracing subscriber from the verbosity flags.
///
/// `RUST_LOG` wins when set, so diagnostics stay scriptable regardless of
/// flags. Diagnostics go to standard error; standard output belongs to the
/// installer's progress messages.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else if verbose {
        "packup=debug"
    } else {
        "packup=warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_defaults_to_install() {
        let cli = Cli::try_parse_from(["packup"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.force);
    }

    #[test]
    fn force_has_two_spellings() {
        let long = Cli::try_parse_from(["packup", "--force"]).unwrap();
        let short = Cli::try_parse_from(["packup", "-f"]).unwrap();
        assert!(long.force);
        assert!(short.force);
    }

    #[test]
    fn force_is_accepted_after_a_subcommand() {
        let cli = Cli::try_parse_from(["packup", "install", "--force"]).unwrap();
        assert!(cli.force);
        assert!(matches!(cli.command, Some(Commands::Install(_))));
    }

    #[test]
    fn self_update_subcommand_parses() {
        let cli = Cli::try_parse_from(["packup", "self-update", "-f"]).unwrap();
        assert!(cli.force);
        assert!(matches!(cli.command, Some(Commands::SelfUpdate(_))));
    }

    #[test]
    fn finish_self_update_requires_a_target() {
        assert!(Cli::try_parse_from(["packup", "finish-self-update"]).is_err());
        let cli =
            Cli::try_parse_from(["packup", "finish-self-update", "--target", "/tmp/packup"])
                .unwrap();
        assert!(matches!(cli.command, Some(Commands::FinishSelfUpdate(_))));
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["packup", "-v", "-q"]).is_err());
    }
}
