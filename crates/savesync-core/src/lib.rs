//! Core reconciliation layer for savesync
//!
//! Reconciles two flat save folders so that each ends up holding the newest
//! copy of every file present in either. Decisions are made from last-write
//! timestamps only; the file about to be overwritten is always backed up
//! first, and a failure on one file never stops the others.
//!
//! The reconciler reports progress as human-readable lines through an
//! injected [`LogSink`] and returns a typed [`SyncReport`].

pub mod backup;
pub mod config;
pub mod decision;
pub mod error;
pub mod listing;
pub mod message;
pub mod reconcile;
pub mod sink;

pub use backup::{BackupFolder, BackupStore};
pub use config::{SideConfig, SyncConfig};
pub use decision::{Decision, Direction, Presence, Side, SideLabels};
pub use error::{Error, FileError, FileErrorKind, Result};
pub use message::Message;
pub use reconcile::{
    FileOutcome, FileReport, Reconciler, RunStatus, SyncOptions, SyncReport,
};
pub use sink::{LogSink, MemorySink, NullSink, TracingSink};
