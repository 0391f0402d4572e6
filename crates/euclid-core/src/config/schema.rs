//! Configuration schema for euclid.toml
//!
//! The record tracks where the game lives, where the remote manifest is
//! published, and which component versions are installed locally.
//! Legacy key names from the first releases (`update_url`, `minecraft_folder`,
//! `modules`) are accepted on read and rewritten canonically on save.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::version::ComponentVersion;

/// Schema version written by this release.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Remote manifest used when the user has not configured one.
pub const DEFAULT_REMOTE_MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/TheKrafter/EUCLIDApp/main/example_remote_config.yml";

pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 120;

/// Root configuration structure for euclid.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Where the remote manifest is fetched from
    #[serde(alias = "update_url", default = "default_remote_manifest_url")]
    pub remote_manifest_url: String,

    /// Game directory components are installed under
    #[serde(
        alias = "minecraft_folder",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub install_root: Option<PathBuf>,

    /// True once a cycle has finished with every component in place
    #[serde(default)]
    pub installed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<DateTime<Utc>>,

    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,

    /// Installed version per component id. Only successful installs land here.
    #[serde(alias = "modules", default)]
    pub component_versions: BTreeMap<String, ComponentVersion>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            remote_manifest_url: DEFAULT_REMOTE_MANIFEST_URL.to_string(),
            install_root: None,
            installed: false,
            last_synced_at: None,
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            component_versions: BTreeMap::new(),
        }
    }

    pub fn with_install_root(mut self, install_root: Option<PathBuf>) -> Self {
        self.install_root = install_root;
        self
    }

    pub fn installed_version(&self, id: &str) -> Option<&ComponentVersion> {
        self.component_versions.get(id)
    }

    /// Record a successfully applied component version.
    pub fn record_installed(&mut self, id: impl Into<String>, version: ComponentVersion) {
        self.component_versions.insert(id.into(), version);
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != CURRENT_SCHEMA_VERSION {
            return Err(format!(
                "unsupported schema_version {} (expected {})",
                self.schema_version, CURRENT_SCHEMA_VERSION
            ));
        }
        url::Url::parse(&self.remote_manifest_url).map_err(|e| {
            format!(
                "remote_manifest_url '{}' is not a valid URL: {}",
                self.remote_manifest_url, e
            )
        })?;
        if self.download_timeout_secs == 0 {
            return Err("download_timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

fn default_remote_manifest_url() -> String {
    DEFAULT_REMOTE_MANIFEST_URL.to_string()
}

fn default_download_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT_SECS
}
