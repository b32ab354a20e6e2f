//! Flat directory listings
//!
//! Only the immediate files of a root are considered. Names are kept as the
//! OS returned them, with no case folding or Unicode normalization.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

use savesync_fs::{Error, Result, io};

/// Names of the regular files directly inside `root`.
///
/// Symlinks are followed. Entries that cannot be read or stat'ed are skipped,
/// as are temp files left behind by an interrupted copy; only failing to open
/// the directory itself is an error.
pub fn list_files(root: &Path) -> Result<BTreeSet<OsString>> {
    let entries = fs::read_dir(root).map_err(|e| Error::io(root, e))?;

    let mut names = BTreeSet::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if io::is_temp_name(&entry.file_name()) {
            tracing::debug!(path = %entry.path().display(), "skipping leftover temp file");
            continue;
        }

        match fs::metadata(entry.path()) {
            Ok(meta) if meta.is_file() => {
                names.insert(entry.file_name());
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(path = %entry.path().display(), error = %e, "skipping entry");
            }
        }
    }

    Ok(names)
}

/// Every name present on either side.
pub fn union(a: &BTreeSet<OsString>, b: &BTreeSet<OsString>) -> BTreeSet<OsString> {
    a.union(b).cloned().collect()
}
