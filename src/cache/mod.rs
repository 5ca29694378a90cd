//! Cache Module
//!
//! Provides an in-memory key/value cache with O(1) LRU promotion and
//! eviction under memory pressure.

mod arena;
mod entry;
mod lru;
mod policy;
mod stats;
mod store;


// Re-export public types
pub use arena::Handle;
pub use entry::{Blob, Entry};
pub use lru::{Iter, RecencyList};
pub use policy::{shed_count, Budget, PressurePolicy, DEFAULT_EVICTION_PERCENT};
pub use stats::CacheStats;
pub use store::LruCache;
