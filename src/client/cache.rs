//! # Bounded Cache
//!
//! A small insertion-order-bounded map for decrypted message plaintexts.
//!
//! Group keys never rotate, so cached entries can never go stale — the only
//! concern is unbounded growth in a long-running session. When the capacity
//! is reached, the oldest inserted entry is evicted; a re-read simply
//! decrypts again.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A map bounded by capacity, evicting in insertion order
pub struct BoundedCache<K, V> {
    capacity: usize,
    entries: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K: Eq + Hash + Clone, V> BoundedCache<K, V> {
    /// Create a cache holding at most `capacity` entries
    ///
    /// A zero capacity disables caching entirely.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Look up a cached value
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert a value, evicting the oldest entry when full
    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }

        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
            if self.order.len() > self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
        }
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut cache = BoundedCache::new(4);
        cache.insert((1u64, 0u64), "hello".to_string());

        assert_eq!(cache.get(&(1, 0)), Some(&"hello".to_string()));
        assert_eq!(cache.get(&(1, 1)), None);
    }

    #[test]
    fn test_eviction_is_insertion_ordered() {
        let mut cache = BoundedCache::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c");

        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.get(&3), Some(&"c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_reinsert_updates_in_place() {
        let mut cache = BoundedCache::new(2);
        cache.insert(1, "a");
        cache.insert(1, "b");
        cache.insert(2, "c");

        assert_eq!(cache.get(&1), Some(&"b"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let mut cache = BoundedCache::new(0);
        cache.insert(1, "a");
        assert!(cache.is_empty());
    }
}
