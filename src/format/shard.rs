//! Shard blobs: fixed-capacity slices of entry records.
//!
//! Entry ids address the dataset globally: `id / shard_size` selects the
//! shard, `id % shard_size` the slot within it. A shard blob begins with a
//! `shard_size x u32` offset table whose values are absolute byte positions
//! within the blob (all of them landing after the table); the records
//! themselves are self-delimiting.

use super::entry::{decode_entry, Entry};
use crate::error::{Error, Result};

/// Split a global entry id into `(shard_index, local_index)`.
///
/// Callers must have validated `shard_size != 0` (index parsing does).
pub fn split_id(id: u32, shard_size: u32) -> (u32, u32) {
    (id / shard_size, id % shard_size)
}

/// Dataset file name for a shard: lowercase 3-hex-digit zero-padded.
pub fn shard_name(shard_index: u32) -> String {
    format!("{:03x}", shard_index)
}

/// One decoded-on-demand shard: the raw blob plus its declared capacity.
///
/// Holding raw bytes (rather than pre-decoded entries) keeps cached shards
/// compact; entries are transient and decoded per query.
#[derive(Debug, Clone)]
pub struct Shard {
    data: Vec<u8>,
    shard_size: u32,
}

impl Shard {
    /// Wrap a shard blob, validating that the offset table fits.
    pub fn new(data: Vec<u8>, shard_size: u32) -> Result<Self> {
        let table = shard_size as usize * 4;
        if data.len() < table {
            return Err(Error::format(format!(
                "shard truncated: {} bytes, offset table needs {}",
                data.len(),
                table
            )));
        }
        Ok(Self { data, shard_size })
    }

    /// Decode the entry at a local slot index.
    pub fn entry(&self, local: u32) -> Result<Entry> {
        if local >= self.shard_size {
            return Err(Error::format(format!(
                "shard slot {} out of range (shard size {})",
                local, self.shard_size
            )));
        }
        let slot = local as usize * 4;
        let offset = u32::from_be_bytes(self.data[slot..slot + 4].try_into().expect("4-byte slice"));
        decode_entry(&self.data, offset as usize)
    }
}

// ============================================================================
// Tests
// ============================================================================
