//! Pre-overwrite backups
//!
//! Before a newer file replaces an older one, the older file is copied to
//! `<backup-root>/<YYYY-MM-DD_HH-MM-SS>_<direction>/<filename>`. Backups are
//! never read back by a run and are kept indefinitely.

mod store;

pub use store::{BackupFolder, BackupStore, STAMP_FORMAT};
