//! Backup store implementation
//!
//! Handles naming, creating and listing backup folders.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use savesync_fs::{CopyMode, io};
use serde::Serialize;

use crate::Result;
use crate::decision::Direction;

/// `strftime` format of the timestamp part of a backup folder name
pub const STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// An existing backup folder
#[derive(Debug, Clone, Serialize)]
pub struct BackupFolder {
    /// Folder name, `<stamp>_<direction>`
    pub name: String,
    pub path: PathBuf,
    /// When the run that created it started, if the name parses
    pub created: Option<NaiveDateTime>,
    pub direction: Option<Direction>,
    /// File names inside, sorted
    pub files: Vec<String>,
}

/// Append-only store of pre-overwrite copies
#[derive(Debug, Clone)]
pub struct BackupStore {
    root: PathBuf,
}

impl BackupStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<platform data dir>/savesync/Backups`
    pub fn default_root() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("savesync").join("Backups"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn folder_name(stamp: &NaiveDateTime, direction: Direction) -> String {
        format!("{}_{}", stamp.format(STAMP_FORMAT), direction)
    }

    /// Where a backup of `name` goes for the given run stamp and direction.
    pub fn entry_path(&self, name: &OsStr, direction: Direction, stamp: &NaiveDateTime) -> PathBuf {
        self.root
            .join(Self::folder_name(stamp, direction))
            .join(name)
    }

    /// Create the backup folder for `name` and return the entry path inside it.
    pub fn prepare(&self, name: &OsStr, direction: Direction, stamp: &NaiveDateTime) -> Result<PathBuf> {
        let entry = self.entry_path(name, direction, stamp);
        if let Some(folder) = entry.parent() {
            fs::create_dir_all(folder).map_err(|e| savesync_fs::Error::io(folder, e))?;
        }
        Ok(entry)
    }

    /// Copy the current content of `target` to `entry`.
    ///
    /// An entry left by an earlier run in the same second is replaced.
    pub fn store(&self, target: &Path, entry: &Path) -> Result<()> {
        io::copy_atomic(target, entry, CopyMode::Overwrite)?;
        tracing::debug!(
            target_file = %target.display(),
            backup = %entry.display(),
            "stored backup"
        );
        Ok(())
    }

    /// List backup folders, newest first.
    pub fn list(&self) -> Result<Vec<BackupFolder>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut folders = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(|e| savesync_fs::Error::io(&self.root, e))? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };

            let (created, direction) = parse_folder_name(&name);
            let mut files: Vec<String> = fs::read_dir(&path)
                .map_err(|e| savesync_fs::Error::io(&path, e))?
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            files.sort();

            folders.push(BackupFolder {
                name,
                path,
                created,
                direction,
                files,
            });
        }

        folders.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(folders)
    }
}

fn parse_folder_name(name: &str) -> (Option<NaiveDateTime>, Option<Direction>) {
    let Some((stamp, direction)) = name.rsplit_once('_') else {
        return (None, None);
    };
    (
        NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok(),
        Direction::parse(direction),
    )
}
