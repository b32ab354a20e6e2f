//! Command implementations for savesync-cli

pub mod backups;
pub mod config;
pub mod sync;

pub use backups::run_backups;
pub use config::{run_config_set, run_config_show};
pub use sync::{run_status, run_sync};
