//! packup CLI entry point.
//!
//! Parses arguments and dispatches to the commands:
//! - `install` (default) - sync content packs with the latest release
//! - `self-update` - replace the installer executable via the staged helper
//! - `finish-self-update` - hidden completion signal used by the helper

use anyhow::Result;
use clap::Parser;
use packup::cli;
use packup::core::display_fatal;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            display_fatal(&e);
            std::process::exit(1);
        }
    }
}
