//! [`SaveFolders`] builder for reconciliation scenarios.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// A fixed reference time, so scenarios read as `T`, `T+10s`, ...
pub fn base_time() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

/// Set a file's last-write time.
///
/// # Panics
/// Panics if the file cannot be opened for writing.
pub fn set_mtime(path: &Path, time: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .and_then(|f| f.set_modified(time))
        .unwrap_or_else(|e| panic!("set_mtime: {}: {e}", path.display()));
}

/// Two save roots plus a backup root inside one temporary directory.
///
/// # Example
///
/// ```rust,no_run
/// use savesync_test_utils::SaveFolders;
///
/// let folders = SaveFolders::new();
/// folders.write_a("user1.dat", "newer", 10);
/// folders.write_b("user1.dat", "older", 0);
/// assert_eq!(folders.read_b("user1.dat"), "older");
/// ```
pub struct SaveFolders {
    temp_dir: TempDir,
}

impl Default for SaveFolders {
    fn default() -> Self {
        Self::new()
    }
}

impl SaveFolders {
    /// Create `steam/` and `xbox/` roots. The backup root is not created.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("steam")).unwrap();
        fs::create_dir(temp_dir.path().join("xbox")).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn a(&self) -> PathBuf {
        self.root().join("steam")
    }

    pub fn b(&self) -> PathBuf {
        self.root().join("xbox")
    }

    pub fn backups(&self) -> PathBuf {
        self.root().join("backups")
    }

    /// Write `name` under A, stamped `offset_secs` after [`base_time`].
    pub fn write_a(&self, name: &str, content: &str, offset_secs: u64) -> PathBuf {
        write_at(&self.a().join(name), content, offset_secs)
    }

    /// Write `name` under B, stamped `offset_secs` after [`base_time`].
    pub fn write_b(&self, name: &str, content: &str, offset_secs: u64) -> PathBuf {
        write_at(&self.b().join(name), content, offset_secs)
    }

    pub fn read_a(&self, name: &str) -> String {
        fs::read_to_string(self.a().join(name)).unwrap()
    }

    pub fn read_b(&self, name: &str) -> String {
        fs::read_to_string(self.b().join(name)).unwrap()
    }

    pub fn mtime_a(&self, name: &str) -> SystemTime {
        fs::metadata(self.a().join(name)).unwrap().modified().unwrap()
    }

    pub fn mtime_b(&self, name: &str) -> SystemTime {
        fs::metadata(self.b().join(name)).unwrap().modified().unwrap()
    }

    /// Every file under the backup root, as `<folder>/<file>` paths, sorted.
    pub fn backup_entries(&self) -> Vec<String> {
        let root = self.backups();
        if !root.exists() {
            return Vec::new();
        }
        let mut entries = Vec::new();
        for folder in fs::read_dir(&root).unwrap() {
            let folder = folder.unwrap().path();
            for file in fs::read_dir(&folder).unwrap() {
                let file = file.unwrap().path();
                entries.push(format!(
                    "{}/{}",
                    folder.file_name().unwrap().to_string_lossy(),
                    file.file_name().unwrap().to_string_lossy()
                ));
            }
        }
        entries.sort();
        entries
    }

    /// Content of the single backup of `name`.
    ///
    /// # Panics
    /// Panics unless exactly one backup of `name` exists.
    pub fn backup_content(&self, name: &str) -> String {
        let suffix = format!("/{name}");
        let matches: Vec<_> = self
            .backup_entries()
            .into_iter()
            .filter(|e| e.ends_with(&suffix))
            .collect();
        assert_eq!(matches.len(), 1, "expected one backup of {name}, found {matches:?}");
        fs::read_to_string(self.backups().join(&matches[0])).unwrap()
    }
}

fn write_at(path: &Path, content: &str, offset_secs: u64) -> PathBuf {
    fs::write(path, content).unwrap();
    set_mtime(path, base_time() + Duration::from_secs(offset_secs));
    path.to_path_buf()
}
