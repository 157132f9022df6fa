//! Bounded least-recently-used cache.
//!
//! A fixed-capacity map with O(1) recency updates: an index-addressed
//! doubly linked list threaded through a slot arena, plus a key-to-slot
//! map. Slots are allocated once up to capacity and reused on eviction, so
//! a warm cache never reallocates.
//!
//! The loader passed to [`LruCache::get_or_try_insert`] runs only on a
//! miss; if it fails, nothing is cached and the error propagates.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Sentinel for "no slot" in the linked-list indices.
const NIL: usize = usize::MAX;

struct Slot<K, V> {
    key: K,
    value: V,
    /// Toward the most-recently-used end
    prev: usize,
    /// Toward the least-recently-used end
    next: usize,
}

/// Fixed-capacity LRU cache.
pub struct LruCache<K, V> {
    capacity: usize,
    map: FxHashMap<K, usize>,
    slots: Vec<Slot<K, V>>,
    /// Most-recently-used slot, or NIL when empty
    head: usize,
    /// Least-recently-used slot, or NIL when empty
    tail: usize,
}

impl<K: Clone + Eq + Hash, V> LruCache<K, V> {
    /// Create a cache holding at most `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "LruCache capacity must be non-zero");
        Self {
            capacity,
            map: FxHashMap::default(),
            slots: Vec::with_capacity(capacity),
            head: NIL,
            tail: NIL,
        }
    }

    /// Maximum number of cached values.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of cached values.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Look up a key, marking it most-recently-used on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let slot = *self.map.get(key)?;
        self.move_to_front(slot);
        Some(&self.slots[slot].value)
    }

    /// Look up a key without touching recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|&slot| &self.slots[slot].value)
    }

    /// Return the cached value for `key`, or load, insert, and return it.
    ///
    /// Either way the key ends up most-recently-used. Inserting into a full
    /// cache evicts the least-recently-used value. A loader error caches
    /// nothing.
    pub fn get_or_try_insert<E>(
        &mut self,
        key: K,
        load: impl FnOnce() -> Result<V, E>,
    ) -> Result<&V, E> {
        if let Some(&slot) = self.map.get(&key) {
            self.move_to_front(slot);
            return Ok(&self.slots[slot].value);
        }

        let value = load()?;
        let slot = if self.map.len() == self.capacity {
            self.reuse_lru_slot(key.clone(), value)
        } else {
            let slot = self.slots.len();
            self.slots.push(Slot {
                key: key.clone(),
                value,
                prev: NIL,
                next: NIL,
            });
            self.link_front(slot);
            slot
        };
        self.map.insert(key, slot);
        Ok(&self.slots[slot].value)
    }

    /// Evict the least-recently-used entry and reuse its slot for a new
    /// key/value, linked in at the front.
    fn reuse_lru_slot(&mut self, key: K, value: V) -> usize {
        let slot = self.tail;
        debug_assert_ne!(slot, NIL, "reuse_lru_slot on empty cache");
        self.unlink(slot);
        let evicted = std::mem::replace(
            &mut self.slots[slot],
            Slot {
                key,
                value,
                prev: NIL,
                next: NIL,
            },
        );
        self.map.remove(&evicted.key);
        self.link_front(slot);
        slot
    }

    fn move_to_front(&mut self, slot: usize) {
        if self.head == slot {
            return;
        }
        self.unlink(slot);
        self.link_front(slot);
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.slots[slot].prev, self.slots[slot].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.slots[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.slots[next].prev = prev;
        }
    }

    fn link_front(&mut self, slot: usize) {
        self.slots[slot].prev = NIL;
        self.slots[slot].next = self.head;
        if self.head != NIL {
            self.slots[self.head].prev = slot;
        }
        self.head = slot;
        if self.tail == NIL {
            self.tail = slot;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(v: u32) -> impl FnOnce() -> Result<u32, String> {
        move || Ok(v)
    }

    #[test]
    fn test_miss_then_hit() {
        let mut cache: LruCache<&str, u32> = LruCache::new(2);
        assert!(cache.get(&"a").is_none());

        assert_eq!(*cache.get_or_try_insert("a", ok(1)).unwrap(), 1);
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_loader_not_called_on_hit() {
        let mut cache: LruCache<&str, u32> = LruCache::new(2);
        cache.get_or_try_insert("a", ok(1)).unwrap();

        let v = cache
            .get_or_try_insert("a", || -> Result<u32, String> {
                panic!("loader must not run on a hit")
            })
            .unwrap();
        assert_eq!(*v, 1);
    }

    #[test]
    fn test_capacity_bound_and_lru_eviction() {
        let mut cache: LruCache<u32, u32> = LruCache::new(3);
        for k in 0..3 {
            cache.get_or_try_insert(k, ok(k * 10)).unwrap();
        }
        assert_eq!(cache.len(), 3);

        // recency order is now 2, 1, 0; inserting evicts 0 only
        cache.get_or_try_insert(3, ok(30)).unwrap();
        assert_eq!(cache.len(), 3);
        assert!(cache.peek(&0).is_none());
        assert!(cache.peek(&1).is_some());
        assert!(cache.peek(&2).is_some());
        assert!(cache.peek(&3).is_some());
    }

    #[test]
    fn test_get_refreshes_recency() {
        let mut cache: LruCache<u32, u32> = LruCache::new(2);
        cache.get_or_try_insert(1, ok(10)).unwrap();
        cache.get_or_try_insert(2, ok(20)).unwrap();

        // touch 1 so 2 becomes least-recently-used
        assert_eq!(cache.get(&1), Some(&10));
        cache.get_or_try_insert(3, ok(30)).unwrap();

        assert!(cache.peek(&1).is_some());
        assert!(cache.peek(&2).is_none());
        assert!(cache.peek(&3).is_some());
    }

    #[test]
    fn test_hit_refreshes_recency_without_growth() {
        let mut cache: LruCache<u32, u32> = LruCache::new(2);
        cache.get_or_try_insert(1, ok(10)).unwrap();
        cache.get_or_try_insert(2, ok(20)).unwrap();
        cache.get_or_try_insert(1, ok(99)).unwrap(); // hit, keeps 10
        assert_eq!(cache.len(), 2);

        cache.get_or_try_insert(3, ok(30)).unwrap();
        assert_eq!(cache.peek(&1), Some(&10));
        assert!(cache.peek(&2).is_none());
    }

    #[test]
    fn test_loader_error_caches_nothing() {
        let mut cache: LruCache<u32, u32> = LruCache::new(2);
        let result = cache.get_or_try_insert(1, || Err("load failed".to_string()));
        assert_eq!(result.unwrap_err(), "load failed");
        assert!(cache.is_empty());

        // a later successful load works
        cache.get_or_try_insert(1, ok(10)).unwrap();
        assert_eq!(cache.peek(&1), Some(&10));
    }

    #[test]
    fn test_eviction_churn_reuses_slots() {
        let mut cache: LruCache<u32, u32> = LruCache::new(2);
        for k in 0..100 {
            cache.get_or_try_insert(k, ok(k)).unwrap();
        }
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.slots.len(), 2); // arena never grew past capacity
        assert_eq!(cache.peek(&99), Some(&99));
        assert_eq!(cache.peek(&98), Some(&98));
    }

    #[test]
    fn test_capacity_one() {
        let mut cache: LruCache<u32, u32> = LruCache::new(1);
        cache.get_or_try_insert(1, ok(10)).unwrap();
        cache.get_or_try_insert(2, ok(20)).unwrap();
        assert!(cache.peek(&1).is_none());
        assert_eq!(cache.peek(&2), Some(&20));
    }

    #[test]
    #[should_panic(expected = "capacity must be non-zero")]
    fn test_zero_capacity_panics() {
        let _ = LruCache::<u32, u32>::new(0);
    }
}
