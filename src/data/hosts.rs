//! Host list API client
//!
//! Downloads the raw host list payload with a single authenticated GET.
//! No retries are attempted; the first failure is reported to the caller.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::FetchConfig;

/// Errors that can occur when downloading the host list
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be constructed (bad URL or client setup)
    #[error("Could not create request for {url}: {reason}")]
    RequestBuild { url: String, reason: String },

    /// The connection to the server failed
    #[error("Could not connect to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status (only with `strict_status`)
    #[error("Server at {url} answered with status {status}")]
    Status { url: String, status: StatusCode },

    /// The response body could not be read
    #[error("Could not read host list from {url}: {source}")]
    BodyRead {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Anything that can produce a raw host list payload
#[async_trait]
pub trait HostSource {
    /// Downloads the payload bytes
    async fn fetch(&self) -> Result<Vec<u8>, FetchError>;
}

/// Client for downloading the host list over HTTP(S) with basic auth
///
/// The underlying HTTP client is built on each fetch, so a client setup
/// failure only surfaces when a download is actually needed.
#[derive(Debug, Clone)]
pub struct HostsClient {
    url: String,
    user: String,
    password: String,
    insecure: bool,
    timeout: Option<Duration>,
    strict_status: bool,
}

impl HostsClient {
    /// Creates a client from the fetch configuration
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            url: config.url.clone(),
            user: config.user.clone(),
            password: config.password.clone(),
            insecure: config.insecure,
            timeout: config.timeout,
            strict_status: config.strict_status,
        }
    }

    /// Returns the configured download URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Builds the HTTP client
    ///
    /// Certificate validation is only disabled when `insecure` is set.
    /// Proxy environment variables are not consulted.
    fn build_client(&self) -> Result<Client, FetchError> {
        let mut builder = Client::builder().no_proxy();

        if self.insecure {
            warn!("TLS certificate validation is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().map_err(|e| FetchError::RequestBuild {
            url: self.url.clone(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl HostSource for HostsClient {
    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        let url = Url::parse(&self.url).map_err(|e| FetchError::RequestBuild {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        let client = self.build_client()?;

        info!(url = %self.url, "Downloading host list");

        let response = client
            .get(url)
            .basic_auth(&self.user, Some(&self.password))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            if self.strict_status {
                return Err(FetchError::Status {
                    url: self.url.clone(),
                    status,
                });
            }
            warn!(url = %self.url, status = %status, "Server answered with a non-success status");
        }

        let body = response.bytes().await.map_err(|source| FetchError::BodyRead {
            url: self.url.clone(),
            source,
        })?;

        debug!(bytes = body.len(), "Host list downloaded");
        Ok(body.to_vec())
    }
}
