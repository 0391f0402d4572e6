//! Retrieve and parse the remote manifest.

use tracing::debug;

use crate::download::Downloader;
use crate::error::{Result, SyncError};

use super::{Manifest, ManifestFormat};

pub struct ManifestFetcher<'a> {
    downloader: &'a dyn Downloader,
}

impl<'a> ManifestFetcher<'a> {
    pub fn new(downloader: &'a dyn Downloader) -> Self {
        Self { downloader }
    }

    /// Fetch `url` and parse it into a validated [`Manifest`].
    ///
    /// No retries: a failed fetch is returned to the caller as-is.
    pub fn fetch(&self, url: &str) -> Result<Manifest> {
        let bytes = self.downloader.fetch(url)?;
        let manifest = parse_manifest(url, &bytes)?;
        debug!(url, components = manifest.components.len(), "Fetched manifest");
        Ok(manifest)
    }
}

/// Parse raw manifest bytes fetched from `url`.
pub fn parse_manifest(url: &str, bytes: &[u8]) -> Result<Manifest> {
    let content = std::str::from_utf8(bytes)
        .map_err(|e| SyncError::parse(url, format!("manifest is not UTF-8: {e}")))?;
    let format = ManifestFormat::detect(url, content);
    let manifest = format
        .parse(content)
        .map_err(|e| SyncError::parse(url, format!("{format:?} manifest: {e}")))?;
    manifest.validate().map_err(|e| SyncError::parse(url, e))?;
    Ok(manifest)
}
