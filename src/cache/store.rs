//! Cache Store Module
//!
//! Main cache engine combining a HashMap index with the recency list.
//!
//! The index maps each key to the arena handle of its entry. Promotion
//! relinks the node in place, so handles never change while an entry is
//! alive and the index only changes on insert and removal.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::cache::arena::Handle;
use crate::cache::entry::charge_of;
use crate::cache::policy::shed_count;
use crate::cache::{Blob, Budget, CacheStats, Entry, PressurePolicy, RecencyList};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == LRU Cache ==
/// In-memory key/value cache ordered by recency of use.
///
/// Lookups, writes, promotion and tail eviction are all O(1). Writes that
/// cannot be admitted (budget exceeded or allocation failure) are absorbed
/// by the configured [`PressurePolicy`] and never surface as errors.
#[derive(Debug)]
pub struct LruCache<V = String> {
    /// Key to handle of the entry in `entries`
    index: HashMap<String, Handle>,
    /// Owns the entries, head = most recently used
    entries: RecencyList<V>,
    budget: Budget,
    policy: PressurePolicy,
    /// Sum of key + value bytes over all entries
    used_bytes: usize,
    stats: CacheStats,
}

impl<V: Blob> Default for LruCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Blob> LruCache<V> {
    // == Constructors ==
    /// Creates an unbounded cache that only evicts when an allocation fails.
    pub fn new() -> Self {
        Self::with_budget(Budget::unbounded(), PressurePolicy::default())
    }

    /// Creates a cache with explicit admission limits.
    pub fn with_budget(budget: Budget, policy: PressurePolicy) -> Self {
        Self {
            index: HashMap::new(),
            entries: RecencyList::new(),
            budget,
            policy,
            used_bytes: 0,
            stats: CacheStats::new(),
        }
    }

    /// Creates a cache from loaded configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_budget(config.budget(), config.policy)
    }

    // == Get ==
    /// Returns a copy of the value for `key` and marks it most recently used.
    pub fn get(&mut self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.get_ref(key).cloned()
    }

    // == Get Ref ==
    /// Returns the value for `key` and marks it most recently used.
    ///
    /// The borrow ends before the next mutating call, which may move or
    /// evict the entry. Use [`LruCache::get`] to keep the value.
    pub fn get_ref(&mut self, key: &str) -> Option<&V> {
        let Some(&handle) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let promoted = self.entries.move_to_front(handle);
        debug_assert!(promoted, "index holds a stale handle for {key}");
        self.stats.record_hit();
        self.entries.get(handle).map(|entry| &entry.value)
    }

    // == Put ==
    /// Stores `value` under `key` as the most recently used entry.
    ///
    /// An existing value is replaced in place. If the write cannot be
    /// admitted the pressure policy runs; under [`PressurePolicy::Shed`] the
    /// write is then dropped.
    pub fn put(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.index.get(&key).copied() {
            Some(handle) => self.update(handle, value),
            None => self.insert(key, value),
        }
    }

    fn insert(&mut self, key: String, value: V) {
        let charge = charge_of(&key, &value);
        if self.policy == PressurePolicy::MakeRoom {
            if let Err(err) = self.budget.admit(1, charge) {
                self.drop_write(&key, &err);
                return;
            }
        }

        // Reserve everything before touching either structure
        while let Err(err) = self.reserve_insert(charge) {
            if !self.relieve(&err, None) {
                self.drop_write(&key, &err);
                return;
            }
        }

        let handle = match self.entries.push_front(Entry::new(key.clone(), value)) {
            Ok(handle) => handle,
            Err(err) => {
                self.drop_write(&key, &err);
                return;
            }
        };
        self.index.insert(key, handle);
        self.used_bytes = self.used_bytes.saturating_add(charge);
        self.stats.record_insert();
    }

    fn reserve_insert(&mut self, charge: usize) -> Result<()> {
        self.budget
            .admit(self.len() + 1, self.used_bytes.saturating_add(charge))?;
        self.entries.try_reserve_one()?;
        self.index.try_reserve(1)?;
        Ok(())
    }

    fn update(&mut self, handle: Handle, value: V) {
        let Some(entry) = self.entries.get(handle) else {
            return;
        };
        let old_charge = entry.charge();
        let new_charge = charge_of(&entry.key, &value);

        if self.policy == PressurePolicy::MakeRoom {
            if let Err(err) = self.budget.admit(1, new_charge) {
                let key = entry.key.clone();
                self.drop_write(&key, &err);
                return;
            }
            // Promote first so the entry is never its own victim
            self.entries.move_to_front(handle);
        }

        loop {
            let bytes = (self.used_bytes - old_charge).saturating_add(new_charge);
            let Err(err) = self.budget.admit(self.len(), bytes) else {
                break;
            };
            let key = self
                .entries
                .get(handle)
                .map(|entry| entry.key.clone())
                .unwrap_or_default();
            if !self.relieve(&err, Some(handle)) {
                self.drop_write(&key, &err);
                return;
            }
        }

        self.entries.move_to_front(handle);
        if let Some(slot) = self.entries.value_mut(handle) {
            *slot = value;
        }
        self.used_bytes = (self.used_bytes - old_charge).saturating_add(new_charge);
        self.stats.record_update();
    }

    /// Runs the pressure policy. Returns true when the write should be retried.
    fn relieve(&mut self, err: &CacheError, protect: Option<Handle>) -> bool {
        if let CacheError::Allocation(_) = err {
            warn!("Allocation failed with {} entries cached: {}", self.len(), err);
        }

        match self.policy {
            PressurePolicy::Shed { .. } => {
                self.eviction_pass();
                false
            }
            PressurePolicy::MakeRoom => {
                let tail = self.entries.tail();
                if tail.is_none() || tail == protect {
                    return false;
                }
                self.evict_one().is_some()
            }
        }
    }

    fn drop_write(&mut self, key: &str, err: &CacheError) {
        self.stats.record_dropped_write();
        warn!("Dropped write for key {:?}: {}", key, err);
    }

    // == Evict One ==
    /// Removes the least recently used entry.
    ///
    /// Returns None if the cache is empty.
    pub fn evict_one(&mut self) -> Option<(String, V)> {
        let entry = self.entries.pop_back()?;
        self.index.remove(&entry.key);
        self.used_bytes -= entry.charge();
        self.stats.record_eviction();
        trace!("Evicted key {:?}", entry.key);
        Some(entry.into_parts())
    }

    // == Eviction Pass ==
    /// Removes the policy's share of entries (at least one) from the tail.
    ///
    /// Returns the number of entries removed; zero for an empty cache.
    pub fn eviction_pass(&mut self) -> usize {
        let count = shed_count(self.len(), self.policy.shed_percent());
        if count == 0 {
            return 0;
        }

        for _ in 0..count {
            self.evict_one();
        }
        self.stats.record_eviction_pass();
        debug!(
            "Eviction pass removed {} entries, {} remaining",
            count,
            self.len()
        );
        count
    }

    // == Remove ==
    /// Removes an entry by key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let handle = self.index.remove(key)?;
        let entry = self.entries.remove(handle)?;
        self.used_bytes -= entry.charge();
        Some(entry.value)
    }

    // == Peek ==
    /// Returns the value for `key` without changing its recency.
    pub fn peek(&self, key: &str) -> Option<&V> {
        let handle = *self.index.get(key)?;
        self.entries.get(handle).map(|entry| &entry.value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();
        self.used_bytes = 0;
    }

    // == Ordered View ==
    /// Entries from most to least recently used.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &V)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Key + value bytes currently held.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn policy(&self) -> PressurePolicy {
        self.policy
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_usage(self.len(), self.used_bytes);
        stats
    }

    /// Panics if the index and the recency list disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        use std::collections::HashSet;

        assert_eq!(self.index.len(), self.entries.len(), "index/list size mismatch");
        let mut seen = HashSet::new();
        let mut bytes = 0;
        for entry in self.entries.iter() {
            assert!(seen.insert(entry.key.as_str()), "duplicate key {}", entry.key);
            let handle = self.index.get(&entry.key).expect("entry without index mapping");
            assert_eq!(
                self.entries.get(*handle).map(|e| e.key.as_str()),
                Some(entry.key.as_str()),
                "index points at the wrong entry"
            );
            bytes += entry.charge();
        }
        assert_eq!(bytes, self.used_bytes, "byte accounting drifted");
    }
}
