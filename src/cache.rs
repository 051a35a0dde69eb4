//! Bounded memoization map with first-in-first-out eviction.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Default number of entries held by the engine's caches
pub const DEFAULT_CAPACITY: usize = 1000;

/// A map holding at most `capacity` entries.
///
/// When full, inserting a new key evicts the oldest *inserted* key. Reads do
/// not affect eviction order, and overwriting an existing key keeps its
/// original position in the queue.
#[derive(Debug, Clone)]
pub struct FifoCache<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite `key`, returning the evicted entry if any.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.order
                .pop_front()
                .and_then(|oldest| self.entries.remove(&oldest).map(|v| (oldest, v)))
        } else {
            None
        };

        self.order.push_back(key.clone());
        self.entries.insert(key, value);
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl<K, V> Default for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let mut cache = FifoCache::new(4);
        assert!(cache.put("a", 1).is_none());
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evicts_oldest_inserted() {
        let mut cache = FifoCache::default();
        for i in 0..DEFAULT_CAPACITY {
            cache.put(i, i * 10);
        }
        assert_eq!(cache.len(), DEFAULT_CAPACITY);

        let evicted = cache.put(DEFAULT_CAPACITY, 0);
        assert_eq!(evicted, Some((0, 0)));
        assert_eq!(cache.len(), DEFAULT_CAPACITY);
        assert!(!cache.contains_key(&0));
        assert!(cache.contains_key(&1));
        assert!(cache.contains_key(&DEFAULT_CAPACITY));
    }

    #[test]
    fn test_reads_do_not_refresh_position() {
        let mut cache = FifoCache::new(2);
        cache.put("first", 1);
        cache.put("second", 2);
        assert_eq!(cache.get(&"first"), Some(&1));

        let evicted = cache.put("third", 3);
        assert_eq!(evicted, Some(("first", 1)));
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut cache = FifoCache::new(2);
        cache.put("first", 1);
        cache.put("second", 2);
        assert!(cache.put("first", 100).is_none());
        assert_eq!(cache.len(), 2);

        let evicted = cache.put("third", 3);
        assert_eq!(evicted, Some(("first", 100)));
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut cache = FifoCache::new(0);
        cache.put(1, "one");
        cache.put(2, "two");
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&2), Some(&"two"));
    }

    #[test]
    fn test_clear() {
        let mut cache = FifoCache::new(3);
        cache.put(1, 1);
        cache.put(2, 2);
        cache.clear();
        assert!(cache.is_empty());
        cache.put(3, 3);
        cache.put(4, 4);
        cache.put(5, 5);
        assert_eq!(cache.put(6, 6), Some((3, 3)));
    }
}
