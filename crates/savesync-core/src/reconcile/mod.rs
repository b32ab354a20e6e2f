//! Two-root reconciliation
//!
//! [`Reconciler::synchronize`] is the single entry point: it takes two
//! directory paths and a log sink, and returns a [`SyncReport`].

mod engine;
mod report;

pub use engine::{Reconciler, SyncOptions};
pub use report::{FileOutcome, FileReport, RunStatus, SyncReport};
