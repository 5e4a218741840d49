//! Cache-or-refresh logic for the host list
//!
//! `HostGetter` returns the cached list while it is fresh and otherwise
//! downloads, parses and re-caches it. Failing to save the cache never fails
//! the request.

use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::CacheManager;
use crate::config::FetchConfig;
use crate::data::{format_hosts, parse_hosts, FetchError, HostSource, HostsClient, ParseError};

/// Errors that prevent a host list from being produced
#[derive(Debug, Error)]
pub enum HostsError {
    /// Downloading the host list failed
    #[error("Failed to download hosts: {0}")]
    Fetch(#[from] FetchError),

    /// The downloaded payload could not be parsed
    #[error("Failed to parse hosts: {0}")]
    Parse(#[from] ParseError),
}

/// Produces the host list text from the cache or a fresh download
#[derive(Debug)]
pub struct HostGetter<S> {
    cache: CacheManager,
    source: S,
}

impl HostGetter<HostsClient> {
    /// Creates a getter that downloads with an HTTP client configured by `config`
    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(CacheManager::from_config(config), HostsClient::new(config))
    }
}

impl<S: HostSource> HostGetter<S> {
    /// Creates a getter from a cache manager and a host source
    pub fn new(cache: CacheManager, source: S) -> Self {
        Self { cache, source }
    }

    /// Returns the host list using the system clock for freshness
    pub async fn get_hosts(&self) -> Result<String, HostsError> {
        self.get_hosts_at(SystemTime::now()).await
    }

    /// Returns the host list, judging cache freshness at `now`
    ///
    /// # Returns
    /// * `Ok(String)` with the cached text on a hit, or the fresh text on a miss
    /// * `Err(HostsError)` if a refresh was needed and failed; nothing is cached
    pub async fn get_hosts_at(&self, now: SystemTime) -> Result<String, HostsError> {
        if let Some(text) = self.cache.read_fresh(now) {
            info!("Using cached host list");
            return Ok(text);
        }

        let text = self.download_parse_hosts().await?;

        debug!("Downloaded and parsed, saving to cache");
        match self.cache.write(&text) {
            Ok(()) => {
                let path = self.cache.cache_path();
                info!(path = %path.display(), "Saved hosts in cache");
            }
            Err(e) => warn!(error = %e, "Downloaded and parsed ok, could not save to cache"),
        }

        Ok(text)
    }

    async fn download_parse_hosts(&self) -> Result<String, HostsError> {
        let data = self.source.fetch().await?;
        let names = parse_hosts(&data)?;
        debug!(hosts = names.len(), "Parsed host list");
        Ok(format_hosts(&names))
    }
}
