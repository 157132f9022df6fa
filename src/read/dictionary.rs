//! The query engine: term resolution against one loaded dataset.
//!
//! A [`Dictionary`] owns the decoded term index (immutable) and the shard
//! cache (internally synchronized), so one shared instance serves
//! concurrent queries from many threads. Entries and results are
//! query-local; nothing from a result is cached.

use crate::error::Result;
use crate::format::entry::Entry;
use crate::format::index::TermIndex;
use crate::normalize::normalize;
use crate::read::rank::{rank_entries, rank_meaning_groups};
use crate::read::shard_cache::ShardCache;
use crate::storage::{StorageRead, INDEX_NAME};
use std::sync::Arc;

/// Default maximum number of shards kept in memory.
pub const DEFAULT_SHARD_CACHE_CAPACITY: usize = 14;

/// Tuning knobs for loading a dictionary.
#[derive(Debug, Clone)]
pub struct DictionaryConfig {
    /// Maximum number of shards kept in memory (LRU-evicted).
    pub shard_cache_capacity: usize,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            shard_cache_capacity: DEFAULT_SHARD_CACHE_CAPACITY,
        }
    }
}

/// The outcome of one query: the term that actually matched (or, for an
/// unresolved query, the original normalized term) and the ranked entries.
///
/// An unresolved query is not an error; it yields an empty `entries` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub term: String,
    pub entries: Vec<Entry>,
}

impl QueryResult {
    fn unmatched(term: String) -> Self {
        Self {
            term,
            entries: Vec::new(),
        }
    }
}

/// Fallback transforms tried, in order, when the term itself misses.
///
/// Each step is literal string surgery applied to the term *as modified by
/// the previous step* (cumulative, not independent alternatives) — e.g.
/// stripping `ing` from `running` yields `runn`, not the lemma `run`.
/// This is a lookup strategy matching how the dataset is keyed, not
/// linguistic stemming.
const FALLBACKS: &[(&str, fn(&str) -> Option<String>)] = &[
    ("strip 's", strip_possessive),
    ("strip s", strip_plural),
    ("remove dashes", remove_dashes),
    ("strip ly", strip_ly),
    ("strip ing", strip_ing),
];

fn strip_possessive(term: &str) -> Option<String> {
    term.strip_suffix("'s").map(str::to_owned)
}

fn strip_plural(term: &str) -> Option<String> {
    term.strip_suffix('s').map(str::to_owned)
}

fn remove_dashes(term: &str) -> Option<String> {
    term.contains('-').then(|| term.replace('-', ""))
}

fn strip_ly(term: &str) -> Option<String> {
    term.strip_suffix("ly").map(str::to_owned)
}

fn strip_ing(term: &str) -> Option<String> {
    term.strip_suffix("ing").map(str::to_owned)
}

/// One loaded, read-only dictionary dataset.
pub struct Dictionary {
    index: TermIndex,
    shards: ShardCache,
}

impl Dictionary {
    /// Load a dictionary with the default configuration.
    pub fn load(storage: Arc<dyn StorageRead>) -> Result<Self> {
        Self::load_with(storage, DictionaryConfig::default())
    }

    /// Load a dictionary: read and parse the index, set up the shard cache.
    ///
    /// Shards are not touched until the first query that needs them.
    pub fn load_with(storage: Arc<dyn StorageRead>, config: DictionaryConfig) -> Result<Self> {
        let index = TermIndex::parse(&storage.read_bytes(INDEX_NAME)?)?;
        let shards = ShardCache::new(storage, index.shard_size(), config.shard_cache_capacity);
        Ok(Self { index, shards })
    }

    /// Resolve a free-text term to ranked entries.
    pub fn query(&self, term: &str) -> Result<QueryResult> {
        self.query_normalized(&normalize(term))
    }

    /// Like [`query`](Self::query), for a term already normalized with
    /// [`normalize`].
    pub fn query_normalized(&self, term: &str) -> Result<QueryResult> {
        if term.is_empty() {
            return Ok(QueryResult::unmatched(String::new()));
        }

        // look up the word, plus some basic fallbacks
        let mut term = term.to_owned();
        let original = term.clone();
        let mut ids = self.index.lookup(&term);
        if ids.is_empty() {
            for (label, transform) in FALLBACKS {
                if let Some(next) = transform(&term) {
                    term = next;
                    ids = self.index.lookup(&term);
                    tracing::trace!(
                        fallback = label,
                        term = %term,
                        hits = ids.len(),
                        "fallback lookup"
                    );
                    if !ids.is_empty() {
                        break;
                    }
                }
            }
        }
        if ids.is_empty() {
            // report the pre-fallback term, not an intermediate candidate
            return Ok(QueryResult::unmatched(original));
        }

        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            entries.push(self.shards.entry(id)?);
        }
        rank_entries(&term, &mut entries);
        for entry in &mut entries {
            rank_meaning_groups(&term, entry);
        }
        Ok(QueryResult { term, entries })
    }

    /// Materialize the raw index matches for a normalized term, in table
    /// order: no fallbacks, no ranking.
    pub fn lookup(&self, term: &str) -> Result<Vec<Entry>> {
        self.index
            .lookup(term)
            .into_iter()
            .map(|id| self.shards.entry(id))
            .collect()
    }

    /// Materialize a single entry by its global id.
    pub fn entry(&self, id: u32) -> Result<Entry> {
        self.shards.entry(id)
    }

    /// Suggest index keys starting with the term, shortest first, up to
    /// `limit` if given. Normalizes the input.
    pub fn autocomplete(&self, term: &str, limit: Option<usize>) -> Vec<String> {
        self.index.lookup_prefix(&normalize(term), limit)
    }

    /// Entries per shard, as declared by the dataset.
    pub fn shard_size(&self) -> u32 {
        self.index.shard_size()
    }

    /// Number of shards currently cached.
    pub fn cached_shards(&self) -> usize {
        self.shards.cached_shards()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallbacks_are_literal_surgery() {
        assert_eq!(strip_possessive("cat's"), Some("cat".into()));
        assert_eq!(strip_possessive("cats"), None);
        assert_eq!(strip_plural("cats"), Some("cat".into()));
        assert_eq!(remove_dashes("a-b-c"), Some("abc".into()));
        assert_eq!(remove_dashes("abc"), None);
        assert_eq!(strip_ly("quickly"), Some("quick".into()));
        assert_eq!(strip_ing("running"), Some("runn".into())); // not "run"
    }

    #[test]
    fn test_fallback_order() {
        let labels: Vec<&str> = FALLBACKS.iter().map(|(label, _)| *label).collect();
        assert_eq!(
            labels,
            vec!["strip 's", "strip s", "remove dashes", "strip ly", "strip ing"]
        );
    }
}
