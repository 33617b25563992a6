//! Offline asset cache.
//!
//! A fixed set of static assets is precached into a local directory so the
//! app shell keeps working without a network. Retrieval is network-first:
//! a successful fetch refreshes the cached copy, a failed one falls back to
//! it. The sync data endpoint never goes through this cache; it is served
//! by the sync client alone.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};

/// Name of the cache directory under the configured cache root.
pub const CACHE_NAME: &str = "smartcart-v2-cache";

/// Timeout for asset fetches.
const FETCH_TIMEOUT_SECS: u64 = 15;

/// Errors from offline cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to read or write a cache file.
    #[error("Cache I/O error at {0}: {1}")]
    Io(PathBuf, #[source] io::Error),

    /// The network fetch failed and no cached copy exists.
    #[error("Asset unavailable: {0}")]
    Unavailable(String),
}

/// Where a fetched asset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    Network,
    Cache,
}

/// File-backed asset cache keyed by URL digest.
#[derive(Debug, Clone)]
pub struct AssetCache {
    dir: PathBuf,
    client: reqwest::Client,
}

impl AssetCache {
    /// Creates a cache rooted at `<base>/smartcart-v2-cache`.
    pub fn new(base: &Path) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            dir: base.join(CACHE_NAME),
            client,
        }
    }

    /// Returns the cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        self.dir.join(format!("{:x}", digest))
    }

    /// Returns whether a cached copy of `url` exists.
    pub fn contains(&self, url: &str) -> bool {
        self.entry_path(url).exists()
    }

    fn store(&self, url: &str, bytes: &[u8]) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).map_err(|e| CacheError::Io(self.dir.clone(), e))?;
        let path = self.entry_path(url);
        fs::write(&path, bytes).map_err(|e| CacheError::Io(path, e))?;
        Ok(())
    }

    fn load(&self, url: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(url);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Io(path, e)),
        }
    }

    /// Downloads and stores every asset in the list.
    ///
    /// A single asset failing to download is logged and skipped; the rest
    /// of the list is still cached. Returns the number of assets cached.
    pub async fn precache(&self, assets: &[String]) -> Result<usize, CacheError> {
        let mut cached = 0;
        for url in assets {
            match self.download(url).await {
                Ok(bytes) => {
                    self.store(url, &bytes)?;
                    cached += 1;
                    debug!("precached {}", url);
                }
                Err(e) => warn!("failed to precache {}: {}", url, e),
            }
        }
        Ok(cached)
    }

    /// Network-first retrieval.
    ///
    /// A successful fetch refreshes the cached copy; on network failure
    /// the cached copy is served instead.
    pub async fn fetch(&self, url: &str) -> Result<(Vec<u8>, Served), CacheError> {
        match self.download(url).await {
            Ok(bytes) => {
                self.store(url, &bytes)?;
                Ok((bytes, Served::Network))
            }
            Err(e) => {
                debug!("network fetch of {} failed ({}), trying cache", url, e);
                match self.load(url)? {
                    Some(bytes) => Ok((bytes, Served::Cache)),
                    None => Err(CacheError::Unavailable(url.to_string())),
                }
            }
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}
