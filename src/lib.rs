//! LRU Memory Cache - an in-memory key/value cache
//!
//! A hash index over a recency-ordered list keeps lookup, insertion and
//! promotion O(1). Under memory pressure the least recently used entries
//! are evicted first.
//!
//! ```
//! use lru_memory_cache::LruCache;
//!
//! let mut cache = LruCache::new();
//! cache.put("k1", "v1".to_string());
//! cache.put("k2", "v2".to_string());
//! assert_eq!(cache.get("k1").as_deref(), Some("v1"));
//! assert_eq!(cache.iter().map(|(k, _)| k).collect::<Vec<_>>(), ["k1", "k2"]);
//! ```

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Budget, CacheStats, LruCache, PressurePolicy};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
