//! Sync and status command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use colored::{ColoredString, Colorize};
use savesync_core::{
    FileOutcome, LogSink, Reconciler, RunStatus, SyncConfig, SyncOptions, SyncReport,
};

use crate::cli::FolderArgs;
use crate::error::{CliError, Result};

/// Prints each line with a local `[HH:MM:SS]` prefix.
///
/// Goes to stderr when stdout is reserved for JSON.
struct ConsoleSink {
    to_stderr: bool,
}

impl LogSink for ConsoleSink {
    fn log(&self, line: &str) {
        let stamp = format!("[{}]", Local::now().format("%H:%M:%S")).dimmed();
        if self.to_stderr {
            eprintln!("{} {}", stamp, colorize(line));
        } else {
            println!("{} {}", stamp, colorize(line));
        }
    }
}

fn colorize(line: &str) -> ColoredString {
    let tag = line.split(']').next().unwrap_or_default();
    match tag {
        "[Error" => line.red(),
        "[Success" => line.green(),
        "[Backup" | "[Sync" => line.yellow(),
        "[New" => line.cyan(),
        "[Plan" => line.blue(),
        _ => line.normal(),
    }
}

/// Merge command-line overrides into the saved config and pick the folders.
pub(crate) fn resolve(config_path: &Path, folders: &FolderArgs) -> Result<(SyncOptions, PathBuf, PathBuf)> {
    let mut config = SyncConfig::load(config_path)?;
    if let Some(root) = &folders.backup_root {
        config.backup_root = Some(root.clone());
    }

    let side_a = folders.side_a.clone().or_else(|| config.side_a.path.clone());
    let side_b = folders.side_b.clone().or_else(|| config.side_b.path.clone());
    let (Some(side_a), Some(side_b)) = (side_a, side_b) else {
        return Err(CliError::user(format!(
            "Please select both {} and {} save folders.",
            config.side_a.label, config.side_b.label
        )));
    };

    Ok((config.options()?, display_path(side_a), display_path(side_b)))
}

/// Canonical form when the folder exists, as given otherwise.
fn display_path(path: PathBuf) -> PathBuf {
    dunce::canonicalize(&path).unwrap_or(path)
}

/// Run the sync command
pub async fn run_sync(config_path: &Path, folders: &FolderArgs, dry_run: bool, json: bool) -> Result<()> {
    let (options, side_a, side_b) = resolve(config_path, folders)?;
    let reconciler = Reconciler::new(options.with_dry_run(dry_run));

    let sink: Arc<dyn LogSink> = Arc::new(ConsoleSink { to_stderr: json });
    let report = reconciler.synchronize(side_a, side_b, sink).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    check_report(&report)
}

/// Map a finished report onto the process exit status.
fn check_report(report: &SyncReport) -> Result<()> {
    match &report.status {
        RunStatus::Completed => {}
        RunStatus::PathNotFound { .. } | RunStatus::ListingFailed { .. } => {
            return Err(CliError::user("Sync did not run"));
        }
        RunStatus::Aborted { message } => {
            return Err(CliError::user(format!("Sync aborted: {message}")));
        }
    }

    let failed = report.failures().count();
    if failed > 0 {
        return Err(CliError::user(format!("{failed} file(s) could not be synced")));
    }
    Ok(())
}

/// Run the status command
///
/// Prints what a sync would do without touching anything.
pub fn run_status(config_path: &Path, folders: &FolderArgs, json: bool) -> Result<()> {
    let (options, side_a, side_b) = resolve(config_path, folders)?;
    let labels = options.labels.clone();
    let report = Reconciler::new(options).plan(&side_a, &side_b);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match &report.status {
        RunStatus::Completed => {}
        RunStatus::PathNotFound { side, path } => {
            return Err(CliError::user(format!(
                "{} path not found: {}",
                labels.get(*side),
                path.display()
            )));
        }
        RunStatus::ListingFailed { message } | RunStatus::Aborted { message } => {
            return Err(CliError::user(format!("Failed to list files: {message}")));
        }
    }

    println!("{} {}: {}", "=>".blue().bold(), labels.a, side_a.display());
    println!("{} {}: {}", "=>".blue().bold(), labels.b, side_b.display());

    if !report.any_action() {
        println!("{} All files are up to date.", "OK".green().bold());
        return Ok(());
    }

    for file in &report.files {
        match &file.outcome {
            FileOutcome::Planned { decision } => {
                println!("   {} {}: {}", "~".yellow(), file.name.cyan(), decision.describe(&labels));
            }
            FileOutcome::Failed { error } => {
                println!("   {} {}: {}", "!".red(), file.name.cyan(), error);
            }
            _ => {}
        }
    }

    Ok(())
}
