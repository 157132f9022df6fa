//! Storage-backed shard cache: the only shared mutable state in a loaded
//! dictionary.
//!
//! Shards are fetched lazily on first reference, held as raw blobs in a
//! bounded LRU, and re-fetched transparently after eviction. One mutex
//! serializes the whole lookup-or-load, storage read included; two queries
//! never race to decode the same shard, at the cost of distinct shards not
//! loading in parallel.
//!
//! A failed read or a corrupt blob caches nothing: the next reference
//! retries the load from storage.

use crate::error::Result;
use crate::format::shard::{shard_name, split_id, Shard};
use crate::format::entry::Entry;
use crate::read::lru::LruCache;
use crate::storage::StorageRead;
use std::sync::{Arc, Mutex};

/// Bounded cache of loaded shards for one dictionary.
pub struct ShardCache {
    storage: Arc<dyn StorageRead>,
    shard_size: u32,
    shards: Mutex<LruCache<u32, Arc<Shard>>>,
}

impl ShardCache {
    /// Create a cache over `storage` holding at most `capacity` shards.
    pub fn new(storage: Arc<dyn StorageRead>, shard_size: u32, capacity: usize) -> Self {
        Self {
            storage,
            shard_size,
            shards: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Materialize the entry with the given global id.
    pub fn entry(&self, id: u32) -> Result<Entry> {
        let (shard_index, local) = split_id(id, self.shard_size);
        let shard = self.shard(shard_index)?;
        shard.entry(local)
    }

    /// Fetch a shard from cache or storage, marking it most-recently-used.
    pub fn shard(&self, shard_index: u32) -> Result<Arc<Shard>> {
        let mut shards = self.shards.lock().expect("Mutex poisoned");
        let shard = shards.get_or_try_insert(shard_index, || {
            let name = shard_name(shard_index);
            tracing::debug!(shard = %name, "loading shard");
            let bytes = self.storage.read_bytes(&name)?;
            Ok(Arc::new(Shard::new(bytes, self.shard_size)?))
        })?;
        Ok(Arc::clone(shard))
    }

    /// Number of shards currently cached.
    pub fn cached_shards(&self) -> usize {
        self.shards.lock().expect("Mutex poisoned").len()
    }
}

// ============================================================================
// Tests
// ============================================================================
