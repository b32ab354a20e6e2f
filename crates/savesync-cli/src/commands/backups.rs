//! Backup listing command

use std::path::Path;

use colored::Colorize;
use savesync_core::{BackupStore, SyncConfig};

use crate::error::Result;

/// List backup folders, newest first
pub fn run_backups(config_path: &Path, backup_root: Option<&Path>, json: bool) -> Result<()> {
    let root = match backup_root {
        Some(root) => root.to_path_buf(),
        None => SyncConfig::load(config_path)?.resolved_backup_root()?,
    };
    let folders = BackupStore::new(&root).list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&folders)?);
        return Ok(());
    }

    if folders.is_empty() {
        println!("No backups in {}", root.display());
        return Ok(());
    }

    println!("{} {}", "Backups in".bold(), root.display());
    for folder in &folders {
        println!("  {} {}", "+".green(), folder.name.cyan());
        for file in &folder.files {
            println!("      {}", file);
        }
    }

    Ok(())
}
