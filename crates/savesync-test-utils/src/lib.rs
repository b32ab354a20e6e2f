//! Shared test utilities for the savesync workspace.
//!
//! This crate provides save-folder fixtures with controlled modification
//! times. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`saves`]: [`SaveFolders`] builder for two-root reconciliation scenarios

pub mod saves;

pub use saves::{SaveFolders, base_time, set_mtime};
