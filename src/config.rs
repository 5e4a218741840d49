//! Runtime configuration for fetching and caching the host list

use std::path::PathBuf;
use std::time::Duration;

/// Settings for one host list request, fixed for the process lifetime
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Download URL of the host list
    pub url: String,
    /// Basic auth user name
    pub user: String,
    /// Basic auth password
    pub password: String,
    /// Directory holding the cache file
    pub cache_dir: PathBuf,
    /// Name of the cache file inside `cache_dir`
    pub cache_file: String,
    /// How long a cached list stays fresh
    pub cache_duration: Duration,
    /// Accept invalid TLS certificates (self-signed endpoints)
    ///
    /// This removes protection against man-in-the-middle attacks and must
    /// be opted into explicitly.
    pub insecure: bool,
    /// Overall request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Treat a non-2xx response as a download failure
    ///
    /// Off by default: the body is parsed whatever the status.
    pub strict_status: bool,
}

impl FetchConfig {
    /// Full path of the cache file
    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(&self.cache_file)
    }
}
