//! Status lines emitted during a run
//!
//! Every line a run can produce is one [`Message`] variant; `Display` renders
//! the exact text handed to the log sink.

use std::fmt;
use std::path::Path;

use crate::decision::Direction;
use crate::error::{FileError, FileErrorKind};

#[derive(Debug, Clone, Copy)]
pub enum Message<'a> {
    PathNotFound {
        label: &'a str,
        path: &'a Path,
    },
    Starting {
        label_a: &'a str,
        path_a: &'a Path,
        label_b: &'a str,
        path_b: &'a Path,
    },
    ListingFailed {
        message: &'a str,
    },
    NewFile {
        name: &'a str,
        found_in: &'a str,
        copy_to: &'a str,
    },
    Copied {
        name: &'a str,
        to: &'a str,
    },
    BackingUp {
        name: &'a str,
        backup_path: &'a Path,
    },
    Updating {
        name: &'a str,
        direction: Direction,
    },
    Updated {
        name: &'a str,
    },
    BackupFailed {
        name: &'a str,
        message: &'a str,
    },
    CopyFailed {
        name: &'a str,
        message: &'a str,
    },
    FileFailed {
        name: &'a str,
        error: &'a FileError,
    },
    Planned {
        name: &'a str,
        description: &'a str,
    },
    UpToDate,
    RunFailed {
        message: &'a str,
    },
}

impl Message<'_> {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::PathNotFound { .. }
                | Self::ListingFailed { .. }
                | Self::BackupFailed { .. }
                | Self::CopyFailed { .. }
                | Self::FileFailed { .. }
                | Self::RunFailed { .. }
        )
    }
}

impl fmt::Display for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathNotFound { label, path } => {
                write!(f, "[Error] {label} path not found: {}", path.display())
            }
            Self::Starting {
                label_a,
                path_a,
                label_b,
                path_b,
            } => write!(
                f,
                "[Info] Starting sync check between:\n{label_a}: {}\n{label_b}: {}",
                path_a.display(),
                path_b.display()
            ),
            Self::ListingFailed { message } => write!(f, "[Error] Failed to list files: {message}"),
            Self::NewFile {
                name,
                found_in,
                copy_to,
            } => write!(f, "[New] Found {name} in {found_in} only. Copying to {copy_to}..."),
            Self::Copied { name, to } => write!(f, "[Success] Copied {name} to {to}."),
            Self::BackingUp { name, backup_path } => {
                write!(f, "[Backup] Backing up {name} to {}...", backup_path.display())
            }
            Self::Updating { name, direction } => write!(f, "[Sync] Updating {name} ({direction})..."),
            Self::Updated { name } => write!(f, "[Success] {name} updated successfully."),
            Self::BackupFailed { name, message } => write!(
                f,
                "[Error] Backup failed for {name}: {message}. Aborting sync for this file."
            ),
            Self::CopyFailed { name, message } => write!(f, "[Error] Copy failed for {name}: {message}"),
            Self::FileFailed { name, error } => {
                let what = match error.kind {
                    FileErrorKind::Io => "IO Exception",
                    FileErrorKind::AccessDenied => "Access Denied",
                    FileErrorKind::Unexpected => "Unexpected error",
                };
                write!(f, "[Error] {what} syncing {name}: {}", error.message)
            }
            Self::Planned { name, description } => write!(f, "[Plan] {name}: {description}"),
            Self::UpToDate => f.write_str("[Info] All files are up to date."),
            Self::RunFailed { message } => write!(f, "[Error] Unexpected error during sync: {message}"),
        }
    }
}
