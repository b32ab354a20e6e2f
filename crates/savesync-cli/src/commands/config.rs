//! Configuration display and update commands

use std::path::Path;

use colored::Colorize;
use savesync_core::{BackupStore, Side, SyncConfig};

use crate::cli::FolderArgs;
use crate::error::Result;

/// Display the current configuration
pub fn run_config_show(config_path: &Path, json: bool) -> Result<()> {
    let config = SyncConfig::load(config_path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "savesync configuration".bold());
    println!("  {:<14} {}", "File:".dimmed(), config_path.display());
    println!();

    for side in [Side::A, Side::B] {
        let entry = config.side(side);
        let path = entry
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".dimmed().to_string());
        println!("  {:<14} {}", format!("{}:", entry.label).dimmed(), path);
    }

    let backup_root = match &config.backup_root {
        Some(root) => root.display().to_string(),
        None => match BackupStore::default_root() {
            Some(root) => format!("{} {}", root.display(), "(default)".dimmed()),
            None => "(not set)".dimmed().to_string(),
        },
    };
    println!("  {:<14} {}", "Backups:".dimmed(), backup_root);
    println!("  {:<14} {}s", "Tolerance:".dimmed(), config.tolerance_secs);

    Ok(())
}

/// Apply the given changes and save the configuration
pub fn run_config_set(
    config_path: &Path,
    folders: &FolderArgs,
    label_a: Option<&str>,
    label_b: Option<&str>,
    tolerance: Option<u64>,
) -> Result<()> {
    let mut config = SyncConfig::load(config_path)?;

    for (side, path, label) in [
        (Side::A, &folders.side_a, label_a),
        (Side::B, &folders.side_b, label_b),
    ] {
        let entry = config.side_mut(side);
        if let Some(path) = path {
            entry.path = Some(path.clone());
        }
        if let Some(label) = label {
            entry.label = label.to_string();
        }
    }
    if let Some(root) = &folders.backup_root {
        config.backup_root = Some(root.clone());
    }
    if let Some(tolerance) = tolerance {
        config.tolerance_secs = tolerance;
    }

    config.save(config_path)?;
    tracing::debug!(path = %config_path.display(), "saved config");

    println!("{} Saved {}", "OK".green().bold(), config_path.display());
    Ok(())
}
