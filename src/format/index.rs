//! Term index: length-bucketed, binary-searchable map from normalized
//! terms to entry ids.
//!
//! The index file is decoded once at load time and is immutable afterwards,
//! so it is safe for unsynchronized concurrent lookups. Bucket `b` holds
//! only keys of byte length `b+1`, stored as one contiguous fixed-width
//! block sorted ascending by raw bytes, with a parallel id block in the
//! same table order. Duplicate keys are homographs: distinct entries that
//! share a spelling.

use super::ByteReader;
use crate::error::{Error, Result};
use std::cmp::Ordering;

/// Decoded term index.
pub struct TermIndex {
    shard_size: u32,
    buckets: Vec<Bucket>,
}

/// One fixed key length. `keys` is `count` back-to-back keys of `key_len`
/// bytes; `ids` is parallel to it in table order (not sorted by id value).
struct Bucket {
    key_len: usize,
    keys: Vec<u8>,
    ids: Vec<u32>,
}

impl TermIndex {
    /// Decode an index file.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(data);
        let shard_size = r.read_u32()?;
        if shard_size == 0 {
            return Err(Error::format("index: shard size must be non-zero"));
        }
        let bucket_count = r.read_u32()? as usize;
        if bucket_count > r.remaining() / 4 {
            return Err(Error::format(format!(
                "index: bucket count {} out of range",
                bucket_count
            )));
        }

        let mut counts = Vec::with_capacity(bucket_count);
        for _ in 0..bucket_count {
            counts.push(r.read_u32()? as usize);
        }

        // all key blocks first, then all id blocks, bucket order ascending
        let mut buckets: Vec<Bucket> = Vec::with_capacity(bucket_count);
        for (bucket, &count) in counts.iter().enumerate() {
            let key_len = bucket + 1;
            let block = count
                .checked_mul(key_len)
                .filter(|&n| n <= r.remaining())
                .ok_or_else(|| {
                    Error::format(format!("index: key block for bucket {} truncated", bucket))
                })?;
            buckets.push(Bucket {
                key_len,
                keys: r.read_bytes(block)?.to_vec(),
                ids: Vec::new(),
            });
        }
        for (bucket, &count) in counts.iter().enumerate() {
            let mut ids = Vec::with_capacity(count.min(r.remaining() / 4));
            for _ in 0..count {
                ids.push(r.read_u32().map_err(|_| {
                    Error::format(format!("index: id block for bucket {} truncated", bucket))
                })?);
            }
            buckets[bucket].ids = ids;
        }

        tracing::debug!(
            shard_size = shard_size,
            buckets = bucket_count,
            keys = buckets.iter().map(|b| b.ids.len()).sum::<usize>(),
            "parsed term index"
        );
        Ok(Self {
            shard_size,
            buckets,
        })
    }

    /// Entries per shard, as declared by the dataset.
    pub fn shard_size(&self) -> u32 {
        self.shard_size
    }

    /// Number of length buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Look up a normalized term, returning the matched entry ids in table
    /// order (dataset insertion order, not sorted by id value).
    ///
    /// Terms whose byte length is zero or `>= bucket_count` never match.
    pub fn lookup(&self, term: &str) -> Vec<u32> {
        let needle = term.as_bytes();
        let len = needle.len();
        if len == 0 || len >= self.buckets.len() {
            return Vec::new();
        }

        let bucket = &self.buckets[len - 1];
        let Some((lo, hi)) = binary_search_range(bucket.ids.len(), |i| {
            needle.cmp(&bucket.keys[i * len..(i + 1) * len])
        }) else {
            return Vec::new();
        };
        bucket.ids[lo..=hi].to_vec()
    }

    /// Collect distinct keys starting with the given normalized prefix,
    /// shortest first, up to `limit` if given.
    ///
    /// Scans every bucket whose key length is at least the prefix length,
    /// binary-searching each on the prefix bytes alone.
    pub fn lookup_prefix(&self, term: &str, limit: Option<usize>) -> Vec<String> {
        let needle = term.as_bytes();
        let len = needle.len();
        if len == 0 || len >= self.buckets.len() || limit == Some(0) {
            return Vec::new();
        }

        let mut words = Vec::new();
        for bucket in &self.buckets[len - 1..] {
            let key_len = bucket.key_len;
            let Some((lo, hi)) = binary_search_range(bucket.ids.len(), |i| {
                needle.cmp(&bucket.keys[i * key_len..i * key_len + len])
            }) else {
                continue;
            };

            let mut last: Option<&[u8]> = None;
            for i in lo..=hi {
                let key = &bucket.keys[i * key_len..(i + 1) * key_len];
                if last != Some(key) {
                    words.push(String::from_utf8_lossy(key).into_owned());
                    if Some(words.len()) == limit {
                        return words;
                    }
                }
                last = Some(key);
            }
        }
        words
    }
}

/// Binary search over `n` slots with an index-parameterized comparator
/// (`needle cmp slot[i]`). Returns any matching position.
fn binary_search(n: usize, cmp: &mut impl FnMut(usize) -> Ordering) -> Option<usize> {
    let (mut lo, mut hi) = (0, n);
    while lo < hi {
        let mid = (lo + hi) / 2;
        match cmp(mid) {
            Ordering::Equal => return Some(mid),
            Ordering::Less => hi = mid,
            Ordering::Greater => lo = mid + 1,
        }
    }
    None
}

/// Binary search, then expand to the full contiguous `[lo, hi]` run of
/// equal keys (duplicate keys are homographs).
fn binary_search_range(n: usize, mut cmp: impl FnMut(usize) -> Ordering) -> Option<(usize, usize)> {
    let found = binary_search(n, &mut cmp)?;
    let mut lo = found;
    let mut hi = found;
    while lo > 0 && cmp(lo - 1) == Ordering::Equal {
        lo -= 1;
    }
    while hi + 1 < n && cmp(hi + 1) == Ordering::Equal {
        hi += 1;
    }
    Some((lo, hi))
}

// ============================================================================
// Tests
// ============================================================================
