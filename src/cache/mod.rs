//! Cache module for storing the host list on disk
//!
//! The cached list is plain text, one host name per line. Freshness is judged
//! from the file's modification time against a configured duration; stale,
//! missing or unreadable files all count as a miss.

mod manager;

pub use manager::{CacheError, CacheManager};
