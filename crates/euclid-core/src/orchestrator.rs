//! Sync cycle orchestration
//!
//! One cycle runs `Idle → LoadingConfig → FetchingManifest → Diffing →
//! Applying → Persisting → Done`. Failing to load the config or fetch the
//! manifest ends the cycle in `Error` before anything on disk is touched.
//! Per-component failures while applying never do; they land in the report.

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::archive::ArchiveExtractor;
use crate::config::{Config, ConfigStore};
use crate::download::Downloader;
use crate::error::{Result, SyncError};
use crate::manifest::{Manifest, ManifestFetcher};
use crate::plan::{self, UpdatePlan};
use crate::sync::{ArtifactSyncer, CancelToken, SyncReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    LoadingConfig,
    FetchingManifest,
    Diffing,
    Applying,
    Persisting,
    Done,
    Error,
}

/// Result of a dry run: what a sync would do right now.
#[derive(Debug, Clone)]
pub struct SyncPreview {
    pub config: Config,
    pub manifest: Manifest,
    pub plan: UpdatePlan,
    /// Installed locally but no longer listed remotely. Never removed.
    pub orphaned: Vec<String>,
}

pub struct SyncOrchestrator {
    store: ConfigStore,
    downloader: Box<dyn Downloader>,
    extractor: Box<dyn ArchiveExtractor>,
    cache_dir: PathBuf,
    in_flight: AtomicBool,
    phase: Mutex<SyncPhase>,
}

impl SyncOrchestrator {
    pub fn new(
        store: ConfigStore,
        downloader: Box<dyn Downloader>,
        extractor: Box<dyn ArchiveExtractor>,
        cache_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            downloader,
            extractor,
            cache_dir,
            in_flight: AtomicBool::new(false),
            phase: Mutex::new(SyncPhase::Idle),
        }
    }

    pub fn config_store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn phase(&self) -> SyncPhase {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run one full cycle.
    ///
    /// Returns `SyncInProgress` without side effects if another cycle is
    /// running on this orchestrator.
    pub fn sync(&self, cancel: &CancelToken) -> Result<SyncReport> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        self.enter(SyncPhase::LoadingConfig);
        let mut config = self.fatal(self.load_config())?;
        let install_root = self.fatal(
            config
                .install_root
                .clone()
                .ok_or(SyncError::MissingInstallRoot),
        )?;

        self.enter(SyncPhase::FetchingManifest);
        let manifest = self.fatal(self.fetch_manifest(&config))?;

        self.enter(SyncPhase::Diffing);
        let plan = plan::diff(&config, &manifest);
        debug!(
            components = plan.len(),
            pending = plan.pending().count(),
            "Computed update plan"
        );

        self.enter(SyncPhase::Applying);
        let syncer = ArtifactSyncer::new(
            self.downloader.as_ref(),
            self.extractor.as_ref(),
            self.download_dir(),
        );
        let report = syncer.apply(&plan, &install_root, cancel);

        self.enter(SyncPhase::Persisting);
        for (id, version) in &report.applied {
            config.record_installed(id.clone(), version.clone());
        }
        if report.is_complete() {
            config.installed = true;
        }
        config.last_synced_at = Some(Utc::now());
        if let Err(err) = self.store.save(&config) {
            warn!(
                succeeded = report.succeeded.len(),
                error = %err,
                "Applied components but failed to record their versions"
            );
            self.enter(SyncPhase::Error);
            return Err(err);
        }

        self.enter(SyncPhase::Done);
        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            cancelled = report.cancelled.len(),
            "Sync cycle finished"
        );
        Ok(report)
    }

    /// Load, fetch and diff without applying or persisting anything beyond a
    /// first-run default config.
    ///
    /// Shares the in-flight guard with [`sync`](Self::sync): while a cycle runs
    /// this returns `SyncInProgress`.
    pub fn check(&self) -> Result<SyncPreview> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        let config = self.load_config()?;
        let manifest = self.fetch_manifest(&config)?;
        let plan = plan::diff(&config, &manifest);
        let orphaned = plan::orphaned(&config, &manifest);
        Ok(SyncPreview {
            config,
            manifest,
            plan,
            orphaned,
        })
    }

    fn load_config(&self) -> Result<Config> {
        self.store.load()
    }

    fn fetch_manifest(&self, config: &Config) -> Result<Manifest> {
        ManifestFetcher::new(self.downloader.as_ref()).fetch(&config.remote_manifest_url)
    }

    fn download_dir(&self) -> PathBuf {
        self.cache_dir.join("downloads")
    }

    fn enter(&self, phase: SyncPhase) {
        debug!(?phase, "Sync phase");
        *self.phase.lock().unwrap_or_else(|e| e.into_inner()) = phase;
    }

    fn fatal<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            warn!(phase = ?self.phase(), error = %err, "Sync cycle aborted");
            self.enter(SyncPhase::Error);
        }
        result
    }
}

/// Holds the in-flight flag for the lifetime of one cycle.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| SyncError::SyncInProgress)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
