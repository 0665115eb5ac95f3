//! Lightweight LRU Cache implementation
//!
//! 메모 테이블용. `max_entries == 0`이면 무제한.

use std::collections::HashMap;
use std::hash::Hash;

/// A simple LRU (Least Recently Used) cache
///
/// 단순함을 우선한다. 축출은 O(n) 스캔이지만 축출은 용량 초과 시에만 일어난다.
#[derive(Debug)]
pub struct LruCache<K, V> {
    entries: HashMap<K, LruEntry<V>>,
    /// 최대 엔트리 수 (0 = 무제한)
    max_entries: usize,
    /// Access counter for LRU tracking
    access_counter: u64,
    evictions: u64,
}

#[derive(Debug)]
struct LruEntry<V> {
    value: V,
    last_access: u64,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    /// Create a new LRU cache with the given capacity (0 = unbounded)
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(max_entries.min(1024)),
            max_entries,
            access_counter: 0,
            evictions: 0,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(0)
    }

    /// Get a reference to a cached value
    ///
    /// Updates the access time for LRU tracking.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.access_counter += 1;
        let counter = self.access_counter;
        self.entries.get_mut(key).map(|entry| {
            entry.last_access = counter;
            &entry.value
        })
    }

    /// Check if a key exists without updating access time
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a value into the cache
    ///
    /// If the cache is at capacity, the least recently used item is evicted.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.access_counter += 1;

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.last_access = self.access_counter;
            return Some(std::mem::replace(&mut entry.value, value));
        }

        if self.max_entries > 0 {
            while self.entries.len() >= self.max_entries {
                self.evict_lru();
            }
        }

        self.entries.insert(
            key,
            LruEntry {
                value,
                last_access: self.access_counter,
            },
        );
        None
    }

    /// Remove a specific key from the cache
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|e| e.value)
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 최대 엔트리 수 (0 = 무제한)
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// 지금까지 축출된 엔트리 수
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_access)
            .map(|(k, _)| k.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.evictions += 1;
        }
    }
}
