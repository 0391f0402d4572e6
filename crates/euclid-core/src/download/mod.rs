//! Fetching bytes by URL.
//!
//! The sync core only needs "give me the bytes behind this URL"; everything
//! HTTP-specific stays in [`HttpDownloader`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::debug;

use crate::error::{Result, SyncError};

pub trait Downloader: Send + Sync {
    /// Fetch the full body behind `url`.
    ///
    /// Unreachable hosts, timeouts and non-2xx responses are all
    /// [`SyncError::Network`].
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

impl<T: Downloader + ?Sized> Downloader for Arc<T> {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        (**self).fetch(url)
    }
}

/// HTTP(S) downloader backed by reqwest.
///
/// Owns a tokio runtime so callers stay synchronous.
#[derive(Debug)]
pub struct HttpDownloader {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl HttpDownloader {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("euclid/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
        Ok(Self { client, runtime })
    }

    async fn fetch_async(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::network(url, e))?;

        if !response.status().is_success() {
            return Err(SyncError::network(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SyncError::network(url, format!("failed to read body: {e}")))?;
        Ok(bytes.to_vec())
    }
}

impl Downloader for HttpDownloader {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        url::Url::parse(url).map_err(|e| SyncError::network(url, format!("invalid URL: {e}")))?;
        debug!(url, "Downloading");
        let bytes = self.runtime.block_on(self.fetch_async(url))?;
        debug!(url, bytes = bytes.len(), "Downloaded");
        Ok(bytes)
    }
}
