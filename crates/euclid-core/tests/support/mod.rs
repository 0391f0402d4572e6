//! Shared fakes for integration tests: in-memory downloads and zip builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, mpsc};

use euclid_core::download::Downloader;
use euclid_core::error::{Result, SyncError};
use euclid_core::orchestrator::SyncOrchestrator;
use euclid_core::prelude::*;
use tempfile::TempDir;

pub const MANIFEST_URL: &str = "https://mods.example.test/remote_config.yml";

/// Build a zip archive in memory from `(path, content)` pairs.
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buf);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            zip.start_file(*name, options)
                .expect("Failed to start zip entry");
            zip.write_all(content.as_bytes())
                .expect("Failed to write zip entry");
        }
        zip.finish().expect("Failed to finish zip");
    }
    buf.into_inner()
}

/// Serves canned responses keyed by URL. Unknown URLs are network errors.
#[derive(Default)]
pub struct MapDownloader {
    responses: Mutex<HashMap<String, Vec<u8>>>,
    requests: Mutex<Vec<String>>,
}

impl MapDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.set(url, body);
        self
    }

    pub fn set(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), body.into());
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Downloader for MapDownloader {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| SyncError::Network {
                url: url.to_string(),
                message: "HTTP 404 Not Found".to_string(),
            })
    }
}

/// Wraps another downloader and blocks on `gate_url` until released.
pub struct GatedDownloader<D> {
    inner: D,
    gate_url: String,
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl<D: Downloader> GatedDownloader<D> {
    /// Returns the downloader, a receiver signalled when the gate is reached,
    /// and a sender that releases it.
    pub fn new(inner: D, gate_url: &str) -> (Self, mpsc::Receiver<()>, mpsc::Sender<()>) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        (
            Self {
                inner,
                gate_url: gate_url.to_string(),
                entered: Mutex::new(entered_tx),
                release: Mutex::new(release_rx),
            },
            entered_rx,
            release_tx,
        )
    }
}

impl<D: Downloader> Downloader for GatedDownloader<D> {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if url == self.gate_url {
            let _ = self.entered.lock().unwrap().send(());
            let _ = self.release.lock().unwrap().recv();
        }
        self.inner.fetch(url)
    }
}

/// Temp layout: config dir, cache dir and install root.
pub struct Sandbox {
    pub temp: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn config_dir(&self) -> PathBuf {
        self.temp.path().join("config")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.temp.path().join("cache")
    }

    pub fn install_root(&self) -> PathBuf {
        self.temp.path().join("minecraft")
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(self.config_dir())
    }

    /// Persist a config pointing at the sandbox install root and manifest URL.
    pub fn write_config(&self, versions: &[(&str, u64)]) -> Config {
        let mut config = Config::new().with_install_root(Some(self.install_root()));
        config.remote_manifest_url = MANIFEST_URL.to_string();
        for (id, version) in versions {
            config.record_installed(*id, ComponentVersion::from(*version));
        }
        self.store().save(&config).expect("Failed to save config");
        config
    }

    pub fn orchestrator(&self, downloader: impl Downloader + 'static) -> SyncOrchestrator {
        SyncOrchestrator::new(
            self.store(),
            Box::new(downloader),
            Box::new(ZipExtractor::new()),
            self.cache_dir(),
        )
    }
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}
