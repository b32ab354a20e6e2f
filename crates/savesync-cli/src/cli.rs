//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// savesync - keep two game save folders in step
#[derive(Parser, Debug)]
#[command(name = "savesync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "SAVESYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Folder overrides shared by `sync` and `status`
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderArgs {
    /// First save folder (Steam by default)
    #[arg(short = 'a', long)]
    pub side_a: Option<PathBuf>,

    /// Second save folder (Xbox by default)
    #[arg(short = 'b', long)]
    pub side_b: Option<PathBuf>,

    /// Where to keep copies of overwritten files
    #[arg(long)]
    pub backup_root: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Reconcile the two save folders
    ///
    /// Every file ends up on both sides in its newest version. Files about
    /// to be overwritten are backed up first.
    ///
    /// Examples:
    ///   savesync sync
    ///   savesync sync -a ~/steam/saves -b /mnt/xbox/saves
    ///   savesync sync --dry-run
    Sync {
        #[command(flatten)]
        folders: FolderArgs,

        /// Show what would change without copying anything
        #[arg(long)]
        dry_run: bool,

        /// Print the run report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Show what a sync would do
    Status {
        #[command(flatten)]
        folders: FolderArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// List backup folders, newest first
    Backups {
        /// Where backups are kept (overrides config)
        #[arg(long)]
        backup_root: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the current configuration
    Show {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Update and save configuration values
    Set {
        #[command(flatten)]
        folders: FolderArgs,

        /// Label for the first folder
        #[arg(long)]
        label_a: Option<String>,

        /// Label for the second folder
        #[arg(long)]
        label_b: Option<String>,

        /// Treat timestamps this many seconds apart as equal
        #[arg(long)]
        tolerance: Option<u64>,
    },
}
