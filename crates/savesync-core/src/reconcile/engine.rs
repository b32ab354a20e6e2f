//! The reconciler
//!
//! One run lists both roots, walks the union of names and settles each name
//! on its own: classify, back up the older copy if one is about to be
//! replaced, copy, report. Work is strictly sequential inside a run.

use std::any::Any;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, TimeDelta, Utc};
use savesync_fs::{CopyMode, display_name, io};

use super::report::{FileOutcome, FileReport, RunStatus, SyncReport};
use crate::backup::BackupStore;
use crate::decision::{self, Decision, Direction, Presence, Side, SideLabels};
use crate::error::FileError;
use crate::listing;
use crate::message::Message;
use crate::sink::{LogSink, NullSink};

/// Settings for a [`Reconciler`]
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub labels: SideLabels,
    /// Where pre-overwrite copies are kept
    pub backup_root: PathBuf,
    /// Timestamp differences up to this much count as equal
    pub tolerance: Duration,
    /// Classify and log, but copy nothing
    pub dry_run: bool,
}

impl SyncOptions {
    pub fn new(backup_root: impl Into<PathBuf>) -> Self {
        Self {
            labels: SideLabels::default(),
            backup_root: backup_root.into(),
            tolerance: Duration::ZERO,
            dry_run: false,
        }
    }

    pub fn with_labels(mut self, labels: SideLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Writes each message to the sink in order.
struct Emitter<'a> {
    sink: &'a dyn LogSink,
}

impl Emitter<'_> {
    fn emit(&self, message: Message<'_>) {
        let line = message.to_string();
        if message.is_error() {
            tracing::warn!(line = %line, "sync error");
        }
        self.sink.log(&line);
    }
}

/// The two roots of one run
struct Roots<'a> {
    a: &'a Path,
    b: &'a Path,
}

impl Roots<'_> {
    fn get(&self, side: Side) -> &Path {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }
}

/// Reconciles two flat directories
#[derive(Debug, Clone)]
pub struct Reconciler {
    options: SyncOptions,
    backups: BackupStore,
}

impl Reconciler {
    pub fn new(options: SyncOptions) -> Self {
        let backups = BackupStore::new(options.backup_root.clone());
        Self { options, backups }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    pub fn backups(&self) -> &BackupStore {
        &self.backups
    }

    /// Run a reconciliation on the blocking thread pool.
    ///
    /// Never fails: every problem is reported to `sink` and recorded in the
    /// returned report.
    pub async fn synchronize(
        &self,
        path_a: impl Into<PathBuf>,
        path_b: impl Into<PathBuf>,
        sink: Arc<dyn LogSink>,
    ) -> SyncReport {
        let started = Utc::now();
        let this = self.clone();
        let (path_a, path_b) = (path_a.into(), path_b.into());
        let task_sink = Arc::clone(&sink);

        let joined = tokio::task::spawn_blocking(move || {
            this.synchronize_blocking(&path_a, &path_b, task_sink.as_ref())
        })
        .await;

        match joined {
            Ok(report) => report,
            Err(e) => {
                let message = if e.is_panic() {
                    panic_message(e.into_panic())
                } else {
                    e.to_string()
                };
                tracing::error!(error = %message, "sync task did not complete");
                Emitter { sink: sink.as_ref() }.emit(Message::RunFailed { message: &message });
                SyncReport::finish(started, RunStatus::Aborted { message }, Vec::new())
            }
        }
    }

    /// Classify every file without touching either root or the backup store.
    pub fn plan(&self, path_a: &Path, path_b: &Path) -> SyncReport {
        let mut options = self.options.clone();
        options.dry_run = true;
        Self::new(options).synchronize_blocking(path_a, path_b, &NullSink)
    }

    /// The body of a run, executed on the calling thread.
    #[tracing::instrument(skip_all, fields(a = %path_a.display(), b = %path_b.display()))]
    pub fn synchronize_blocking(&self, path_a: &Path, path_b: &Path, sink: &dyn LogSink) -> SyncReport {
        let started = Utc::now();
        let log = Emitter { sink };
        let labels = &self.options.labels;
        let roots = Roots { a: path_a, b: path_b };

        for side in [Side::A, Side::B] {
            let root = roots.get(side);
            if !root.is_dir() {
                log.emit(Message::PathNotFound {
                    label: labels.get(side),
                    path: root,
                });
                let status = RunStatus::PathNotFound {
                    side,
                    path: root.to_path_buf(),
                };
                return SyncReport::finish(started, status, Vec::new());
            }
        }

        log.emit(Message::Starting {
            label_a: &labels.a,
            path_a,
            label_b: &labels.b,
            path_b,
        });

        let listed = listing::list_files(path_a)
            .and_then(|a| listing::list_files(path_b).map(|b| (a, b)));
        let names = match listed {
            Ok((a, b)) => listing::union(&a, &b),
            Err(e) => {
                let message = e.to_string();
                log.emit(Message::ListingFailed { message: &message });
                return SyncReport::finish(started, RunStatus::ListingFailed { message }, Vec::new());
            }
        };
        tracing::debug!(files = names.len(), "listed both roots");

        // One stamp per run groups a run's backups by direction.
        let stamp = Local::now().naive_local();
        let files: Vec<FileReport> = names
            .iter()
            .map(|name| FileReport {
                name: display_name(name),
                outcome: self.reconcile_file(&roots, name, &stamp, &log),
            })
            .collect();

        let report = SyncReport::finish(started, RunStatus::Completed, files);
        if !report.any_action() {
            log.emit(Message::UpToDate);
        }
        tracing::info!(
            files = report.files.len(),
            failures = report.failures().count(),
            "sync finished"
        );
        report
    }

    fn reconcile_file(&self, roots: &Roots<'_>, name: &OsStr, stamp: &NaiveDateTime, log: &Emitter<'_>) -> FileOutcome {
        let name_text = display_name(name);
        let path_a = roots.a.join(name);
        let path_b = roots.b.join(name);

        let decision = match self.classify(&path_a, &path_b) {
            Ok(decision) => decision,
            Err(error) => {
                log.emit(Message::FileFailed {
                    name: &name_text,
                    error: &error,
                });
                return FileOutcome::Failed { error };
            }
        };
        tracing::debug!(file = %name_text, ?decision, "classified");

        let Some(direction) = decision.direction() else {
            return match decision {
                Decision::Absent => FileOutcome::Vanished,
                _ => FileOutcome::UpToDate,
            };
        };

        if self.options.dry_run {
            let description = decision.describe(&self.options.labels);
            log.emit(Message::Planned {
                name: &name_text,
                description: &description,
            });
            return FileOutcome::Planned { decision };
        }

        let source = roots.get(direction.source()).join(name);
        let target = roots.get(direction.target()).join(name);
        if decision.overwrites() {
            self.propagate(&source, &target, name, direction, stamp, log)
        } else {
            self.copy_new(&source, &target, &name_text, direction, log)
        }
    }

    fn classify(&self, path_a: &Path, path_b: &Path) -> Result<Decision, FileError> {
        if let Some(decision) = Presence::probe(path_a, path_b).one_sided() {
            return Ok(decision);
        }
        let tolerance = TimeDelta::from_std(self.options.tolerance).unwrap_or(TimeDelta::MAX);
        Ok(decision::compare(
            io::modified_utc(path_a)?,
            io::modified_utc(path_b)?,
            tolerance,
        ))
    }

    /// Copy a file that exists on one side only. There is nothing to back up.
    fn copy_new(&self, source: &Path, target: &Path, name: &str, direction: Direction, log: &Emitter<'_>) -> FileOutcome {
        let labels = &self.options.labels;
        let to = labels.get(direction.target());
        log.emit(Message::NewFile {
            name,
            found_in: labels.get(direction.source()),
            copy_to: to,
        });

        match io::copy_atomic(source, target, CopyMode::CreateNew) {
            Ok(_) => {
                log.emit(Message::Copied { name, to });
                FileOutcome::CopiedNew {
                    to: direction.target(),
                }
            }
            Err(e) => {
                let error = FileError::from(e);
                log.emit(Message::FileFailed { name, error: &error });
                FileOutcome::Failed { error }
            }
        }
    }

    /// Back up the older target, then overwrite it with the newer source.
    ///
    /// A failed backup aborts this file with the target untouched. A failed
    /// overwrite keeps the backup and leaves the target at its old content.
    fn propagate(
        &self,
        source: &Path,
        target: &Path,
        name: &OsStr,
        direction: Direction,
        stamp: &NaiveDateTime,
        log: &Emitter<'_>,
    ) -> FileOutcome {
        let name_text = display_name(name);

        let backup = match self.backups.prepare(name, direction, stamp) {
            Ok(entry) => entry,
            Err(e) => {
                let message = e.to_string();
                log.emit(Message::BackupFailed {
                    name: &name_text,
                    message: &message,
                });
                let backup = self.backups.entry_path(name, direction, stamp);
                return FileOutcome::BackupFailed { message, backup };
            }
        };

        log.emit(Message::BackingUp {
            name: &name_text,
            backup_path: &backup,
        });
        if let Err(e) = self.backups.store(target, &backup) {
            let message = e.to_string();
            log.emit(Message::BackupFailed {
                name: &name_text,
                message: &message,
            });
            return FileOutcome::BackupFailed { message, backup };
        }

        log.emit(Message::Updating {
            name: &name_text,
            direction,
        });
        match io::copy_atomic(source, target, CopyMode::Overwrite) {
            Ok(_) => {
                log.emit(Message::Updated { name: &name_text });
                FileOutcome::Updated { direction, backup }
            }
            Err(e) => {
                let message = e.to_string();
                log.emit(Message::CopyFailed {
                    name: &name_text,
                    message: &message,
                });
                FileOutcome::CopyFailed { message, backup }
            }
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "task panicked".to_string()),
    }
}
