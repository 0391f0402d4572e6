//! Config, cache and game directory resolution helpers.

use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "euclid.toml";

const APP_DIR_NAME: &str = "euclid";

pub fn config_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// `~/.config/euclid` on Linux, `~/Library/Application Support/euclid` on macOS,
/// `%APPDATA%\euclid` on Windows.
pub fn default_config_dir() -> anyhow::Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join(APP_DIR_NAME))
}

/// Where downloaded archives are kept while a cycle runs.
pub fn default_cache_dir() -> anyhow::Result<PathBuf> {
    Ok(dirs::cache_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?
        .join(APP_DIR_NAME))
}

/// The game's default data directory for this platform, if it exists.
pub fn detect_install_root() -> Option<PathBuf> {
    let candidate = if cfg!(target_os = "macos") {
        dirs::config_dir()?.join("minecraft")
    } else if cfg!(windows) {
        dirs::config_dir()?.join(".minecraft")
    } else {
        dirs::home_dir()?.join(".minecraft")
    };
    candidate.is_dir().then_some(candidate)
}
