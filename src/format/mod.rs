//! On-disk dataset formats: term index file, shard blobs, and the
//! length-prefixed binary entry record codec.
//!
//! All multi-byte integers in both files are big-endian `u32`.
//!
//! **Index file** (`"index"`):
//! ```text
//! shard_size: u32
//! bucket_count: u32
//! counts: [u32] x bucket_count
//! For each bucket b: count[b] fixed-width keys of (b+1) bytes each
//! For each bucket b: count[b] entry ids (u32)
//! ```
//! All key blocks come before all id blocks, bucket order ascending. Keys
//! within a bucket are sorted ascending as raw bytes; duplicates are
//! allowed (homographs) and map to distinct ids.
//!
//! **Shard file** (`"000"`..`"fff"`):
//! ```text
//! offsets: [u32] x shard_size   -- absolute byte positions within the blob
//! entry records (self-delimiting, parsed sequentially from their offset)
//! ```
//!
//! **Entry record**: see [`entry`] for the field order.

pub mod entry;
pub mod index;
pub mod shard;

use crate::error::{Error, Result};

/// Sequential big-endian reader over a byte buffer.
///
/// Every read is bounds-checked; running off the end of the buffer is a
/// `Format` error, never a panic.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Start reading at `offset`, validating it lies within the buffer.
    pub(crate) fn at(data: &'a [u8], offset: usize) -> Result<Self> {
        if offset > data.len() {
            return Err(Error::format(format!(
                "record offset {} out of range ({} byte buffer)",
                offset,
                data.len()
            )));
        }
        Ok(Self { data, pos: offset })
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes(bytes.try_into().expect("4-byte slice")))
    }

    pub(crate) fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::format(format!(
                "truncated at byte {}: need {} more bytes, have {}",
                self.pos,
                n,
                self.remaining()
            )));
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Read a `u32` length prefix followed by that many UTF-8 bytes.
    pub(crate) fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::format(format!("invalid UTF-8 in string field: {}", e)))
    }

    /// Read a `u32` count followed by that many length-prefixed strings.
    pub(crate) fn read_string_list(&mut self) -> Result<Vec<String>> {
        let count = self.read_list_count()?;
        let mut list = Vec::with_capacity(count);
        for _ in 0..count {
            list.push(self.read_string()?);
        }
        Ok(list)
    }

    /// Read a list count, rejecting counts that cannot possibly fit in the
    /// remaining bytes (each element carries at least a 4-byte prefix).
    pub(crate) fn read_list_count(&mut self) -> Result<usize> {
        let count = self.read_u32()? as usize;
        if count > self.remaining() / 4 {
            return Err(Error::format(format!(
                "list count {} out of range at byte {} ({} bytes remain)",
                count,
                self.pos,
                self.remaining()
            )));
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u32_big_endian() {
        let mut r = ByteReader::new(&[0x00, 0x00, 0x01, 0x02]);
        assert_eq!(r.read_u32().unwrap(), 258);
    }

    #[test]
    fn test_read_string() {
        let mut buf = vec![0, 0, 0, 3];
        buf.extend_from_slice(b"dog");
        let mut r = ByteReader::new(&buf);
        assert_eq!(r.read_string().unwrap(), "dog");
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_truncated_read_is_error() {
        let mut r = ByteReader::new(&[0, 0]);
        assert!(r.read_u32().is_err());

        // declared length exceeds the buffer
        let mut r = ByteReader::new(&[0, 0, 0, 10, b'a']);
        assert!(r.read_string().is_err());
    }

    #[test]
    fn test_offset_out_of_range() {
        assert!(ByteReader::at(&[1, 2, 3], 4).is_err());
        assert!(ByteReader::at(&[1, 2, 3], 3).is_ok());
    }

    #[test]
    fn test_absurd_list_count_rejected() {
        let mut r = ByteReader::new(&[0xff, 0xff, 0xff, 0xff]);
        assert!(r.read_list_count().is_err());
    }
}
