//! Typed outcome of a reconciliation run
//!
//! The log lines are for people; this is for callers that need to know what
//! happened without scraping text.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::decision::{Decision, Direction, Side};
use crate::error::FileError;

/// How the run as a whole ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    /// Every file in the union was processed
    Completed,
    /// A root was not an existing directory; nothing was touched
    PathNotFound { side: Side, path: PathBuf },
    /// A root could not be listed; nothing was touched
    ListingFailed { message: String },
    /// The run stopped for a reason outside the per-file flow
    Aborted { message: String },
}

/// What happened to one filename
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Present on one side only, copied to the other
    CopiedNew { to: Side },
    /// Older copy backed up, then overwritten by the newer one
    Updated { direction: Direction, backup: PathBuf },
    UpToDate,
    /// Gone from both sides when probed
    Vanished,
    /// Backup of the target failed; the target was not touched
    BackupFailed { message: String, backup: PathBuf },
    /// Backup succeeded, overwrite failed; the target keeps its old content
    CopyFailed { message: String, backup: PathBuf },
    /// Classification or a one-sided copy failed
    Failed { error: FileError },
    /// Dry run: the action that would have been taken
    Planned { decision: Decision },
}

impl FileOutcome {
    /// True for anything other than "nothing to do".
    pub fn is_action(&self) -> bool {
        !matches!(self, Self::UpToDate | Self::Vanished)
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::BackupFailed { .. } | Self::CopyFailed { .. } | Self::Failed { .. }
        )
    }
}

/// One filename's result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// File name as displayed in log lines
    pub name: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Report from a reconciliation run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    #[serde(flatten)]
    pub status: RunStatus,
    pub files: Vec<FileReport>,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
}

impl SyncReport {
    pub(crate) fn finish(started: DateTime<Utc>, status: RunStatus, files: Vec<FileReport>) -> Self {
        Self {
            status,
            files,
            started,
            finished: Utc::now(),
        }
    }

    /// Whether any file needed (or got) an action.
    pub fn any_action(&self) -> bool {
        self.files.iter().any(|f| f.outcome.is_action())
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.outcome.is_failure())
    }

    /// Completed with no per-file failures.
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed && self.failures().next().is_none()
    }

    /// The report entry for `name`, if it was part of the run.
    pub fn file(&self, name: &str) -> Option<&FileOutcome> {
        self.files.iter().find(|f| f.name == name).map(|f| &f.outcome)
    }
}
