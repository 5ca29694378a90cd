//! Cache Statistics Module
//!
//! Tracks cache activity: hits, misses, writes, evictions and dropped writes.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups that found their key
    pub hits: u64,
    /// Lookups that did not find their key
    pub misses: u64,
    /// Writes that created a new entry
    pub inserts: u64,
    /// Writes that replaced an existing value
    pub updates: u64,
    /// Entries removed from the tail
    pub evictions: u64,
    /// Shedding passes run under memory pressure
    pub eviction_passes: u64,
    /// Writes abandoned because they could not be admitted
    pub dropped_writes: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Current key + value bytes held by the cache
    pub used_bytes: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_eviction_pass(&mut self) {
        self.eviction_passes += 1;
    }

    pub fn record_dropped_write(&mut self) {
        self.dropped_writes += 1;
    }

    // == Update Gauges ==
    /// Updates the entry and byte gauges.
    pub fn set_usage(&mut self, total_entries: usize, used_bytes: usize) {
        self.total_entries = total_entries;
        self.used_bytes = used_bytes;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.dropped_writes, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_writes_and_evictions() {
        let mut stats = CacheStats::new();
        stats.record_insert();
        stats.record_insert();
        stats.record_update();
        stats.record_eviction();
        stats.record_eviction_pass();
        stats.record_dropped_write();

        assert_eq!(stats.inserts, 2);
        assert_eq!(stats.updates, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.eviction_passes, 1);
        assert_eq!(stats.dropped_writes, 1);
    }

    #[test]
    fn test_stats_serialize() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.set_usage(3, 42);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["hits"], 1);
        assert_eq!(json["total_entries"], 3);
        assert_eq!(json["used_bytes"], 42);
    }
}
