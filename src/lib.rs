//! gethosts library
//!
//! Fetches a remote host list, caches it on disk with a time-based expiry and
//! filters it by pattern. The modules are exposed for the binary and for
//! integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod filter;
pub mod getter;

pub use cache::{CacheError, CacheManager};
pub use config::FetchConfig;
pub use data::{FetchError, HostSource, HostsClient, ParseError};
pub use filter::PatternFilter;
pub use getter::{HostGetter, HostsError};
