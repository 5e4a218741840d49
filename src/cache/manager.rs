//! Cache manager for persisting the host list to disk
//!
//! Provides a `CacheManager` that stores the formatted host list as a plain
//! text file and decides freshness from the file's modification time.

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::FetchConfig;

/// Errors that can occur when saving the host list to the cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache directory could not be created
    #[error("Could not create cache dir {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cache file could not be written
    #[error("Could not write cache file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Manages reading and writing the cached host list
///
/// The cache is a single text file at `<cache_dir>/<file_name>`. An entry is
/// fresh while `now <= modified + duration`.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where the cache file is stored
    cache_dir: PathBuf,
    /// Name of the cache file
    file_name: String,
    /// How long a written list stays fresh
    duration: Duration,
}

impl CacheManager {
    /// Creates a new CacheManager for the given location and freshness window
    pub fn new(cache_dir: PathBuf, file_name: impl Into<String>, duration: Duration) -> Self {
        Self {
            cache_dir,
            file_name: file_name.into(),
            duration,
        }
    }

    /// Creates a CacheManager from the cache settings of a fetch configuration
    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(
            config.cache_dir.clone(),
            config.cache_file.clone(),
            config.cache_duration,
        )
    }

    /// Returns the full path of the cache file
    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(&self.file_name)
    }

    /// Whether an entry modified at `modified` is still fresh at `now`
    ///
    /// The boundary instant itself counts as fresh. A window too large to
    /// represent never expires.
    pub fn is_fresh(&self, modified: SystemTime, now: SystemTime) -> bool {
        match modified.checked_add(self.duration) {
            Some(expires_at) => now <= expires_at,
            None => true,
        }
    }

    /// Reads the cached host list if it exists, is fresh and is valid text
    ///
    /// Every other outcome (missing, stale, unreadable) returns `None` so the
    /// caller refreshes.
    pub fn read_fresh(&self, now: SystemTime) -> Option<String> {
        let path = self.cache_path();

        let modified = match fs::metadata(&path).and_then(|meta| meta.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                info!(path = %path.display(), error = %e, "No file in cache, downloading");
                return None;
            }
        };

        if !self.is_fresh(modified, now) {
            info!(
                path = %path.display(),
                modified = %DateTime::<Utc>::from(modified),
                "Cached host list expired, downloading"
            );
            return None;
        }

        debug!(path = %path.display(), "Found file in cache");
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupt file in cache, downloading");
                None
            }
        }
    }

    /// Writes the host list to the cache file, creating the directory first
    ///
    /// If the directory cannot be created the write is not attempted.
    pub fn write(&self, text: &str) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir).map_err(|source| CacheError::CreateDir {
            path: self.cache_dir.clone(),
            source,
        })?;

        let path = self.cache_path();
        fs::write(&path, text).map_err(|source| CacheError::Write { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    const HOUR: Duration = Duration::from_secs(3600);

    fn create_test_cache() -> (CacheManager, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = CacheManager::new(temp_dir.path().to_path_buf(), "hostslist.txt", HOUR);
        (cache, temp_dir)
    }

    fn modified_time(path: &Path) -> SystemTime {
        fs::metadata(path).unwrap().modified().unwrap()
    }

    #[test]
    fn test_write_creates_file_in_cache_directory() {
        let (cache, temp_dir) = create_test_cache();

        cache.write("web01\ndb01\n").expect("Write should succeed");

        let expected_path = temp_dir.path().join("hostslist.txt");
        assert_eq!(cache.cache_path(), expected_path);
        assert_eq!(fs::read_to_string(&expected_path).unwrap(), "web01\ndb01\n");
    }

    #[test]
    fn test_write_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("cache").join("dir");
        let cache = CacheManager::new(nested_path.clone(), "hostslist.txt", HOUR);

        cache.write("web01\n").expect("Write should succeed");

        assert!(nested_path.join("hostslist.txt").exists());
    }

    #[test]
    fn test_write_empty_list_creates_empty_file() {
        let (cache, _temp_dir) = create_test_cache();

        cache.write("").expect("Write should succeed");

        assert!(cache.cache_path().exists());
        assert_eq!(cache.read_fresh(SystemTime::now()).as_deref(), Some(""));
    }

    #[test]
    fn test_write_fails_when_dir_cannot_be_created() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let cache = CacheManager::new(blocker.join("cache"), "hostslist.txt", HOUR);

        let result = cache.write("web01\n");

        assert!(matches!(result, Err(CacheError::CreateDir { .. })));
    }

    #[test]
    fn test_write_fails_when_file_is_a_directory() {
        let (cache, _temp_dir) = create_test_cache();
        fs::create_dir(cache.cache_path()).unwrap();

        let result = cache.write("web01\n");

        assert!(matches!(result, Err(CacheError::Write { .. })));
    }

    #[test]
    fn test_overwrite_existing_cache() {
        let (cache, _temp_dir) = create_test_cache();

        cache.write("first\n").unwrap();
        cache.write("second\n").unwrap();

        assert_eq!(cache.read_fresh(SystemTime::now()).as_deref(), Some("second\n"));
    }

    #[test]
    fn test_read_returns_none_for_missing_file() {
        let (cache, _temp_dir) = create_test_cache();
        assert!(cache.read_fresh(SystemTime::now()).is_none());
    }

    #[test]
    fn test_read_fresh_boundary_is_inclusive() {
        let (cache, _temp_dir) = create_test_cache();
        cache.write("web01\n").unwrap();
        let modified = modified_time(&cache.cache_path());

        assert_eq!(cache.read_fresh(modified + HOUR).as_deref(), Some("web01\n"));
        assert!(cache
            .read_fresh(modified + HOUR + Duration::from_millis(1))
            .is_none());
    }

    #[test]
    fn test_read_returns_none_for_invalid_utf8() {
        let (cache, _temp_dir) = create_test_cache();
        fs::write(cache.cache_path(), [0xff, 0xfe, 0x00, 0x41]).unwrap();

        assert!(cache.read_fresh(SystemTime::now()).is_none());
    }

    #[test]
    fn test_is_fresh_zero_duration() {
        let cache = CacheManager::new(PathBuf::from("/unused"), "hostslist.txt", Duration::ZERO);
        let modified = SystemTime::now();

        assert!(cache.is_fresh(modified, modified));
        assert!(!cache.is_fresh(modified, modified + Duration::from_nanos(1)));
    }

    #[test]
    fn test_is_fresh_overflowing_duration_never_expires() {
        let cache = CacheManager::new(PathBuf::from("/unused"), "hostslist.txt", Duration::MAX);
        let now = SystemTime::now();

        assert!(cache.is_fresh(now, now + HOUR * 24 * 365));
    }
}
