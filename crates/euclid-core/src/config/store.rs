//! Config store for loading and saving euclid.toml.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, SyncError};
use crate::fs::atomic::write_atomic;

use super::{Config, parser, paths};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
    defaults: Config,
}

impl ConfigStore {
    pub fn from_default_dir() -> anyhow::Result<Self> {
        Ok(Self::new(paths::default_config_dir()?))
    }

    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_path: paths::config_path_in(&config_dir),
            defaults: Config::new(),
        }
    }

    /// Use `defaults` as the record written on first run and on reset.
    pub fn with_defaults(mut self, defaults: Config) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the record, creating and persisting defaults on first run.
    ///
    /// An existing record that does not parse is reported as
    /// [`SyncError::ConfigCorrupt`] and left on disk; see [`ConfigStore::reset`].
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            info!(path = %self.config_path.display(), "No config found, writing defaults");
            let config = self.defaults.clone();
            self.save(&config)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&self.config_path)
            .map_err(|e| SyncError::persist(&self.config_path, format!("read failed: {e}")))?;

        let config =
            parser::parse_config_str(&content).map_err(|e| SyncError::ConfigCorrupt {
                path: self.config_path.clone(),
                message: format!("{e:#}"),
            })?;
        debug!(
            path = %self.config_path.display(),
            components = config.component_versions.len(),
            "Loaded config"
        );
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let content = parser::to_toml(config)
            .map_err(|e| SyncError::persist(&self.config_path, format!("{e:#}")))?;
        write_atomic(&self.config_path, content.as_bytes())
            .map_err(|e| SyncError::persist(&self.config_path, format!("{e:#}")))?;
        debug!(path = %self.config_path.display(), "Saved config");
        Ok(())
    }

    /// Replace the record with defaults.
    ///
    /// The previous file, if any, is kept as `euclid.toml.corrupt`.
    pub fn reset(&self) -> Result<Config> {
        if self.config_path.exists() {
            let backup = self.backup_path();
            std::fs::rename(&self.config_path, &backup)
                .map_err(|e| SyncError::persist(&backup, e))?;
            warn!(backup = %backup.display(), "Moved previous config aside");
        }
        let config = self.defaults.clone();
        self.save(&config)?;
        Ok(config)
    }

    pub fn backup_path(&self) -> PathBuf {
        let mut name = self
            .config_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".corrupt");
        self.config_path.with_file_name(name)
    }
}
