//! Fetch-and-apply for an update plan.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::archive::{ArchiveExtractor, ExtractError};
use crate::download::Downloader;
use crate::error::{Result, SyncError};
use crate::fs::swap;
use crate::plan::UpdatePlan;

use super::{CancelToken, SyncReport};

/// Applies pending plan entries one at a time, in plan order.
///
/// A component either ends up fully replaced or keeps its previous content;
/// a failure is recorded in the report and the next component still runs.
pub struct ArtifactSyncer<'a> {
    downloader: &'a dyn Downloader,
    extractor: &'a dyn ArchiveExtractor,
    download_dir: PathBuf,
}

impl<'a> ArtifactSyncer<'a> {
    /// `download_dir` holds archives while they are validated and extracted.
    /// It must not be inside the install root.
    pub fn new(
        downloader: &'a dyn Downloader,
        extractor: &'a dyn ArchiveExtractor,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            downloader,
            extractor,
            download_dir,
        }
    }

    pub fn apply(&self, plan: &UpdatePlan, install_root: &Path, cancel: &CancelToken) -> SyncReport {
        let mut report = SyncReport::default();

        for entry in plan.entries() {
            let Some((url, target)) = entry.decision.target() else {
                report.skipped.insert(entry.id.clone());
                continue;
            };

            if cancel.is_cancelled() {
                debug!(id = %entry.id, "Cycle cancelled; not starting component");
                report.cancelled.insert(entry.id.clone());
                continue;
            }

            match self.apply_component(&entry.id, url, install_root) {
                Ok(()) => {
                    info!(id = %entry.id, version = %target, "Applied component");
                    report.record_success(&entry.id, target.clone());
                }
                Err(err) => {
                    warn!(id = %entry.id, error = %err, "Component failed");
                    report.record_failure(&entry.id, err);
                }
            }
        }

        report
    }

    fn apply_component(&self, id: &str, url: &str, install_root: &Path) -> Result<()> {
        let bytes = self.downloader.fetch(url)?;

        let archive = self.archive_path(id, url);
        crate::fs::write_atomic(&archive, &bytes)
            .map_err(|e| SyncError::persist(&archive, format!("{e:#}")))?;

        let result = self.install_archive(id, url, &archive, install_root);

        if let Err(err) = fs::remove_file(&archive) {
            warn!(path = %archive.display(), error = %err, "Failed to remove downloaded archive");
        }
        result
    }

    fn install_archive(
        &self,
        id: &str,
        url: &str,
        archive: &Path,
        install_root: &Path,
    ) -> Result<()> {
        let dst = install_root.join(id);
        let apply_err = |message: String| SyncError::Apply {
            component: id.to_string(),
            path: dst.clone(),
            message,
        };
        let classify = |err: ExtractError| match err {
            ExtractError::Corrupt(message) => SyncError::CorruptArtifact {
                component: id.to_string(),
                url: url.to_string(),
                message,
            },
            io @ ExtractError::Io { .. } => apply_err(io.to_string()),
        };

        self.extractor.validate(archive).map_err(|err| match err {
            ExtractError::Io { .. } => SyncError::persist(archive, err),
            corrupt => classify(corrupt),
        })?;

        fs::create_dir_all(install_root)
            .map_err(|e| apply_err(format!("failed to create install root: {e}")))?;
        swap::recover(&dst).map_err(|e| apply_err(format!("{e:#}")))?;

        let staging = swap::staging_path(&dst).map_err(|e| apply_err(format!("{e:#}")))?;
        fs::create_dir_all(&staging)
            .map_err(|e| apply_err(format!("failed to create staging directory: {e}")))?;

        let staged = self
            .extractor
            .extract(archive, &staging)
            .map_err(classify)
            .and_then(|()| {
                swap::swap_into_place(&staging, &dst).map_err(|e| apply_err(format!("{e:#}")))
            });

        if staged.is_err() && staging.exists() {
            if let Err(err) = swap::remove_path(&staging) {
                warn!(path = %staging.display(), error = %err, "Failed to remove staging directory");
            }
        }
        staged
    }

    fn archive_path(&self, id: &str, url: &str) -> PathBuf {
        let hash = blake3::hash(url.as_bytes());
        self.download_dir
            .join(format!("{}-{}.zip", id, &hash.to_hex()[..16]))
    }
}
