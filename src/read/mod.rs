//! Read-side runtime: the LRU shard cache, relevance ranking, and the
//! query engine that ties them to the decoded term index.

pub mod dictionary;
pub mod lru;
pub mod rank;
pub mod shard_cache;
