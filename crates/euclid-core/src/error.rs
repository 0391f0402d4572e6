//! Error kinds for the sync core.
//!
//! Every variant carries the component id, URL or path it concerns and an
//! owned message, so errors can be cloned into a [`SyncReport`].
//!
//! [`SyncReport`]: crate::sync::SyncReport

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("Config at {path} is corrupt: {message}")]
    ConfigCorrupt { path: PathBuf, message: String },

    #[error("Failed to persist {path}: {message}")]
    Persist { path: PathBuf, message: String },

    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("Failed to parse {source_name}: {message}")]
    Parse { source_name: String, message: String },

    #[error("Artifact for '{component}' from {url} is corrupt: {message}")]
    CorruptArtifact {
        component: String,
        url: String,
        message: String,
    },

    #[error("Failed to apply '{component}' to {path}: {message}")]
    Apply {
        component: String,
        path: PathBuf,
        message: String,
    },

    #[error("A sync cycle is already in progress")]
    SyncInProgress,

    #[error("No install root configured; set one with `euclid config set-install-root`")]
    MissingInstallRoot,
}

impl SyncError {
    pub(crate) fn persist(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Persist {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn network(url: &str, err: impl std::fmt::Display) -> Self {
        Self::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn parse(source_name: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }

    /// Short machine-readable kind name, used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigCorrupt { .. } => "config_corrupt",
            Self::Persist { .. } => "persist_error",
            Self::Network { .. } => "network_error",
            Self::Parse { .. } => "parse_error",
            Self::CorruptArtifact { .. } => "corrupt_artifact",
            Self::Apply { .. } => "apply_error",
            Self::SyncInProgress => "sync_in_progress",
            Self::MissingInstallRoot => "missing_install_root",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_component_and_url() {
        let err = SyncError::CorruptArtifact {
            component: "core".to_string(),
            url: "https://example.test/core.zip".to_string(),
            message: "invalid Zip archive".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("'core'"));
        assert!(text.contains("https://example.test/core.zip"));
    }

    #[test]
    fn kind_names_are_stable() {
        assert_eq!(SyncError::SyncInProgress.kind(), "sync_in_progress");
        assert_eq!(
            SyncError::network("https://x.test", "timeout").kind(),
            "network_error"
        );
    }
}
