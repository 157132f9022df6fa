//! Read-side runtime for the dictpack sharded binary dictionary format.
//!
//! A dictpack dataset is a precomputed, read-only set of files: one
//! `"index"` file mapping normalized terms to entry ids through
//! length-bucketed, binary-searchable key tables, plus shard files
//! (`"000"`..`"fff"`) holding length-prefixed binary entry records. This
//! crate owns the wire formats and the query runtime: term normalization,
//! index lookup with ordered fallback transforms, LRU-cached shard access,
//! and deterministic relevance ranking. The offline dataset compiler is a
//! separate tool.
//!
//! ```no_run
//! use dictpack::{Dictionary, FileStorage};
//! use std::sync::Arc;
//!
//! # fn main() -> dictpack::Result<()> {
//! let dict = Dictionary::load(Arc::new(FileStorage::new("/data/webster")))?;
//! let result = dict.query("Dogs")?;
//! println!("{}: {} entries", result.term, result.entries.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod format;
pub mod normalize;
pub mod read;
pub mod storage;

// ── Errors ───────────────────────────────────────────────────────────────────
pub use error::{Error, Result};

// ── Storage ──────────────────────────────────────────────────────────────────
pub use storage::{FileStorage, MemoryStorage, StorageRead, INDEX_NAME};

// ── Wire formats ─────────────────────────────────────────────────────────────
pub use format::entry::{decode_entry, encode_entry, Entry, Meaning, MeaningGroup};
pub use format::index::TermIndex;
pub use format::shard::{shard_name, split_id, Shard};

// ── Read-side runtime ────────────────────────────────────────────────────────
pub use read::dictionary::{
    Dictionary, DictionaryConfig, QueryResult, DEFAULT_SHARD_CACHE_CAPACITY,
};
pub use read::lru::LruCache;
pub use read::shard_cache::ShardCache;

// ── Normalization ────────────────────────────────────────────────────────────
pub use normalize::normalize;
