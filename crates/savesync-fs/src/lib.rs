//! Filesystem primitives for savesync
//!
//! Provides atomic copy and write operations, timestamp access, and
//! format-agnostic configuration storage.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use io::CopyMode;
pub use path::{NormalizedPath, display_name};
