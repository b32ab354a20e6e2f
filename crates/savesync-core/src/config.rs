//! Persistent configuration
//!
//! Remembers which folders to reconcile, what to call them and where backups
//! go. Stored as TOML (or JSON/YAML, by extension) through
//! [`savesync_fs::ConfigStore`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use savesync_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::backup::BackupStore;
use crate::decision::{Side, SideLabels};
use crate::reconcile::SyncOptions;
use crate::{Error, Result};

/// One reconciled root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideConfig {
    /// Name used in log lines
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl SideConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: None,
        }
    }
}

/// Saved settings for the CLI and other embedders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_root: Option<PathBuf>,
    /// Timestamp differences up to this many seconds count as equal
    pub tolerance_secs: u64,
    pub side_a: SideConfig,
    pub side_b: SideConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        let labels = SideLabels::default();
        Self {
            backup_root: None,
            tolerance_secs: 0,
            side_a: SideConfig::new(labels.a),
            side_b: SideConfig::new(labels.b),
        }
    }
}

impl SyncConfig {
    /// `<platform config dir>/savesync/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("savesync").join("config.toml"))
    }

    /// Load from `path`, or defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let config: Self = ConfigStore::new().load(&NormalizedPath::new(path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        ConfigStore::new().save(&NormalizedPath::new(path), self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let (a, b) = (self.side_a.label.trim(), self.side_b.label.trim());
        if a.is_empty() || b.is_empty() {
            return Err(Error::invalid_config("side labels must not be empty"));
        }
        if a == b {
            return Err(Error::invalid_config(format!(
                "side labels must differ, both are '{a}'"
            )));
        }
        Ok(())
    }

    pub fn side(&self, side: Side) -> &SideConfig {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideConfig {
        match side {
            Side::A => &mut self.side_a,
            Side::B => &mut self.side_b,
        }
    }

    pub fn labels(&self) -> SideLabels {
        SideLabels::new(&self.side_a.label, &self.side_b.label)
    }

    /// The configured backup root, else the platform default.
    pub fn resolved_backup_root(&self) -> Result<PathBuf> {
        self.backup_root
            .clone()
            .or_else(BackupStore::default_root)
            .ok_or_else(|| {
                Error::invalid_config("no backup root configured and no platform data directory")
            })
    }

    pub fn options(&self) -> Result<SyncOptions> {
        self.validate()?;
        Ok(SyncOptions::new(self.resolved_backup_root()?)
            .with_labels(self.labels())
            .with_tolerance(Duration::from_secs(self.tolerance_secs)))
    }
}
