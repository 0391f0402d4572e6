//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::archive::ZipExtractor;
use crate::config::{self, Config, ConfigStore};
use crate::download::HttpDownloader;
use crate::orchestrator::SyncOrchestrator;

/// Paths and collaborators shared by every frontend.
///
/// The CLI creates this once; tests point it at temp directories.
#[derive(Debug, Clone)]
pub struct AppContext {
    config_dir: PathBuf,
    cache_dir: PathBuf,
    detected_install_root: Option<PathBuf>,
}

impl AppContext {
    /// Create a new context with explicit paths.
    pub fn new(config_dir: PathBuf, cache_dir: PathBuf) -> Self {
        Self {
            config_dir,
            cache_dir,
            detected_install_root: None,
        }
    }

    /// Platform default directories, with game directory detection.
    pub fn with_defaults() -> anyhow::Result<Self> {
        Ok(Self::new(
            config::default_config_dir()?,
            config::default_cache_dir()?,
        )
        .with_detected_install_root(config::detect_install_root()))
    }

    /// Install root written into a freshly created config.
    pub fn with_detected_install_root(mut self, install_root: Option<PathBuf>) -> Self {
        self.detected_install_root = install_root;
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get a ConfigStore whose first-run defaults include the detected game directory.
    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::new(self.config_dir.clone())
            .with_defaults(Config::new().with_install_root(self.detected_install_root.clone()))
    }

    /// Get an orchestrator using HTTP downloads and zip extraction.
    ///
    /// The download timeout is read from the current config; a corrupt config
    /// falls back to the default here and is reported when the cycle loads it.
    pub fn orchestrator(&self) -> anyhow::Result<SyncOrchestrator> {
        let store = self.config_store();
        let timeout_secs = store
            .load()
            .map(|c| c.download_timeout_secs)
            .unwrap_or(config::schema::DEFAULT_DOWNLOAD_TIMEOUT_SECS);
        let downloader = HttpDownloader::new(Duration::from_secs(timeout_secs))?;

        Ok(SyncOrchestrator::new(
            store,
            Box::new(downloader),
            Box::new(ZipExtractor::new()),
            self.cache_dir.clone(),
        ))
    }
}
