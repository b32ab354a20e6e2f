//! savesync CLI
//!
//! Command-line host for the save folder reconciler.

mod cli;
mod commands;
mod error;
mod logging;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use savesync_core::SyncConfig;

use cli::{Cli, Commands, ConfigAction};
use error::{CliError, Result};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: could not set up logging: {}", "warning".yellow(), e);
    }
    tracing::debug!("Verbose mode enabled");

    let config_path = resolve_config_path(cli.config)?;

    match cli.command {
        Some(cmd) => execute_command(cmd, config_path).await,
        None => {
            println!("{} save folder sync", "savesync".green().bold());
            println!();
            println!("Run {} for available commands.", "savesync --help".cyan());
            Ok(())
        }
    }
}

fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    explicit
        .or_else(SyncConfig::default_path)
        .ok_or_else(|| CliError::user("No config directory on this platform; pass --config"))
}

async fn execute_command(cmd: Commands, config_path: PathBuf) -> Result<()> {
    match cmd {
        Commands::Sync {
            folders,
            dry_run,
            json,
        } => commands::run_sync(&config_path, &folders, dry_run, json).await,
        Commands::Status { folders, json } => commands::run_status(&config_path, &folders, json),
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => commands::run_config_show(&config_path, json),
            ConfigAction::Set {
                folders,
                label_a,
                label_b,
                tolerance,
            } => commands::run_config_set(
                &config_path,
                &folders,
                label_a.as_deref(),
                label_b.as_deref(),
                tolerance,
            ),
        },
        Commands::Backups { backup_root, json } => {
            commands::run_backups(&config_path, backup_root.as_deref(), json)
        }
    }
}
