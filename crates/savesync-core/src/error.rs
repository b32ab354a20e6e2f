//! Error types for savesync-core

use serde::Serialize;

/// Result type for savesync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside a reconciliation run
///
/// A run itself never fails; everything that goes wrong during one ends up
/// in the log and in the returned report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration failed validation
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Filesystem error from savesync-fs
    #[error(transparent)]
    Fs(#[from] savesync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Category of a failure scoped to a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileErrorKind {
    /// The OS reported an I/O failure
    Io,
    /// The OS refused access
    AccessDenied,
    /// Anything that did not come from the OS
    Unexpected,
}

/// A failure while processing one file; never aborts the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct FileError {
    pub kind: FileErrorKind,
    pub message: String,
}

impl FileError {
    pub fn new(kind: FileErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<savesync_fs::Error> for FileError {
    fn from(err: savesync_fs::Error) -> Self {
        let kind = match err.io_kind() {
            Some(std::io::ErrorKind::PermissionDenied) => FileErrorKind::AccessDenied,
            Some(_) => FileErrorKind::Io,
            None => FileErrorKind::Unexpected,
        };
        Self::new(kind, err.to_string())
    }
}
