//! Atomic I/O operations with file locking

use std::ffi::OsStr;
use std::fs::{self, File, OpenOptions};
use std::io::{self as stdio, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// How [`copy_atomic`] treats an existing target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    /// Replace the target if it exists.
    Overwrite,
    /// Fail with [`Error::AlreadyExists`] if the target exists.
    CreateNew,
}

/// Prefix of every temp file created next to a target.
pub const TEMP_PREFIX: &str = ".savesync-";
/// Suffix of every temp file created next to a target.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Whether `name` looks like a temp file left by [`write_atomic`] or [`copy_atomic`].
pub fn is_temp_name(name: &OsStr) -> bool {
    name.to_str()
        .is_some_and(|n| n.starts_with(TEMP_PREFIX) && n.ends_with(TEMP_SUFFIX))
}

/// Temp file path in the same directory as `target` (ensures same filesystem).
///
/// The name does not embed the target's, so it stays short for any target.
fn temp_path_for(target: &Path) -> PathBuf {
    target.with_file_name(format!(
        "{TEMP_PREFIX}{}{TEMP_SUFFIX}",
        uuid::Uuid::new_v4().simple()
    ))
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Acquires an advisory lock to prevent concurrent access.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_path = temp_path_for(&native_path);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;

    let staged = temp_file
        .write_all(content)
        .and_then(|()| temp_file.sync_all())
        .map_err(|e| Error::io(&temp_path, e));

    // Release lock (implicit on drop, but be explicit)
    let _ = FileExt::unlock(&temp_file);
    drop(temp_file);

    if let Err(e) = staged {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, &native_path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::io(&native_path, e)
    })
}

/// Copy `source` to `target` without ever exposing a partially written target.
///
/// The source is streamed into a temp file next to the target, the temp file
/// is stamped with the source's modification time and flushed, then moved
/// onto the target. With [`CopyMode::CreateNew`] the move refuses to replace
/// anything already at the target, including a dangling symlink, and does so
/// atomically. On any failure the temp file is removed and the target is left
/// exactly as it was.
///
/// Returns the number of bytes copied.
pub fn copy_atomic(source: &Path, target: &Path, mode: CopyMode) -> Result<u64> {
    let mut reader = File::open(source).map_err(|e| Error::io(source, e))?;
    let modified = reader
        .metadata()
        .and_then(|m| m.modified())
        .map_err(|e| Error::io(source, e))?;

    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(parent)
        .map_err(|e| Error::io(parent, e))?;
    let temp_path = staged.path().to_path_buf();

    let bytes = stdio::copy(&mut reader, staged.as_file_mut()).map_err(|e| Error::io(&temp_path, e))?;
    drop(reader);
    staged
        .as_file()
        .set_modified(modified)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| Error::io(&temp_path, e))?;

    let persisted = match mode {
        CopyMode::Overwrite => staged.persist(target),
        CopyMode::CreateNew => staged.persist_noclobber(target),
    };
    // A failed persist hands the temp file back; dropping it removes it.
    if let Err(e) = persisted {
        return Err(match e.error.kind() {
            stdio::ErrorKind::AlreadyExists if mode == CopyMode::CreateNew => Error::AlreadyExists {
                path: target.to_path_buf(),
            },
            _ => Error::io(target, e.error),
        });
    }

    tracing::trace!(
        source = %source.display(),
        target = %target.display(),
        bytes,
        "copied file"
    );
    Ok(bytes)
}

/// Last-write time of a file in UTC.
pub fn modified_utc(path: &Path) -> Result<DateTime<Utc>> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| Error::io(path, e))?;
    Ok(DateTime::<Utc>::from(modified))
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}
