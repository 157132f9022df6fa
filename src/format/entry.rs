//! Entry model and the length-prefixed binary record codec.
//!
//! An entry record is a purely sequential, self-delimiting encoding with a
//! fixed field order:
//!
//! ```text
//! name: str                      -- str = len:u32, utf8 bytes
//! pronunciation: str
//! meaning_groups: u32 count, then per group:
//!     info: [str]                -- [x] = count:u32, then elements
//!     meanings: u32 count, then per meaning:
//!         tags: [str]
//!         text: str
//!         examples: [str]
//!     word_variants: [str]
//! info: str
//! source: str
//! ```
//!
//! There is no length or end marker on the record itself; decoding trusts
//! the declared lengths, and any length or count that runs past the buffer
//! surfaces as a `Format` error.
//!
//! [`encode_entry`] is the exact inverse of [`decode_entry`] and exists for
//! fixture construction (the offline dataset compiler is out of scope).

use super::ByteReader;
use crate::error::Result;

/// One dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Headword, original case
    pub name: String,
    /// May be empty
    pub pronunciation: String,
    /// Ordered clusters of senses
    pub meaning_groups: Vec<MeaningGroup>,
    /// Entry-level notes (e.g. etymology); may be empty
    pub info: String,
    /// Attribution line; may be empty
    pub source: String,
}

/// A cluster of senses for one sub-form of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeaningGroup {
    /// Part of speech, word forms, and similar labels
    pub info: Vec<String>,
    pub meanings: Vec<Meaning>,
    /// Variant spellings this group covers; used only for relevance
    /// ranking, not for matching, so it can be imperfect
    pub word_variants: Vec<String>,
}

/// A single definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meaning {
    pub tags: Vec<String>,
    pub text: String,
    pub examples: Vec<String>,
}

impl Entry {
    /// Total number of meanings across all groups.
    pub fn meaning_count(&self) -> usize {
        self.meaning_groups.iter().map(|g| g.meanings.len()).sum()
    }
}

// ============================================================================
// Decode
// ============================================================================

/// Decode one entry record starting at `offset`.
pub fn decode_entry(data: &[u8], offset: usize) -> Result<Entry> {
    let mut r = ByteReader::at(data, offset)?;
    read_entry(&mut r)
}

fn read_entry(r: &mut ByteReader<'_>) -> Result<Entry> {
    let name = r.read_string()?;
    let pronunciation = r.read_string()?;
    let group_count = r.read_list_count()?;
    let mut meaning_groups = Vec::with_capacity(group_count);
    for _ in 0..group_count {
        meaning_groups.push(read_group(r)?);
    }
    let info = r.read_string()?;
    let source = r.read_string()?;
    Ok(Entry {
        name,
        pronunciation,
        meaning_groups,
        info,
        source,
    })
}

fn read_group(r: &mut ByteReader<'_>) -> Result<MeaningGroup> {
    let info = r.read_string_list()?;
    let meaning_count = r.read_list_count()?;
    let mut meanings = Vec::with_capacity(meaning_count);
    for _ in 0..meaning_count {
        meanings.push(read_meaning(r)?);
    }
    let word_variants = r.read_string_list()?;
    Ok(MeaningGroup {
        info,
        meanings,
        word_variants,
    })
}

fn read_meaning(r: &mut ByteReader<'_>) -> Result<Meaning> {
    let tags = r.read_string_list()?;
    let text = r.read_string()?;
    let examples = r.read_string_list()?;
    Ok(Meaning {
        tags,
        text,
        examples,
    })
}

// ============================================================================
// Encode (fixture construction)
// ============================================================================

/// Append the binary encoding of `entry` to `out`.
pub fn encode_entry(entry: &Entry, out: &mut Vec<u8>) {
    write_str(&entry.name, out);
    write_str(&entry.pronunciation, out);
    write_u32(entry.meaning_groups.len() as u32, out);
    for group in &entry.meaning_groups {
        write_str_list(&group.info, out);
        write_u32(group.meanings.len() as u32, out);
        for meaning in &group.meanings {
            write_str_list(&meaning.tags, out);
            write_str(&meaning.text, out);
            write_str_list(&meaning.examples, out);
        }
        write_str_list(&group.word_variants, out);
    }
    write_str(&entry.info, out);
    write_str(&entry.source, out);
}

fn write_u32(v: u32, out: &mut Vec<u8>) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn write_str(s: &str, out: &mut Vec<u8>) {
    write_u32(s.len() as u32, out);
    out.extend_from_slice(s.as_bytes());
}

fn write_str_list(list: &[String], out: &mut Vec<u8>) {
    write_u32(list.len() as u32, out);
    for s in list {
        write_str(s, out);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> Entry {
        Entry {
            name: "Mercury".into(),
            pronunciation: "ˈmərkyərē".into(),
            meaning_groups: vec![
                MeaningGroup {
                    info: vec!["noun".into(), "Chemistry".into()],
                    meanings: vec![
                        Meaning {
                            tags: vec!["element".into()],
                            text: "a heavy silvery-white metal".into(),
                            examples: vec!["the mercury rises".into()],
                        },
                        Meaning {
                            tags: vec![],
                            text: "the column of mercury in a thermometer".into(),
                            examples: vec![],
                        },
                    ],
                    word_variants: vec!["quicksilver".into()],
                },
                MeaningGroup {
                    info: vec![],
                    meanings: vec![Meaning {
                        tags: vec!["Astronomy".into()],
                        text: "the innermost planet".into(),
                        examples: vec![],
                    }],
                    word_variants: vec![],
                },
            ],
            info: "Latin Mercurius".into(),
            source: "Example Dictionary".into(),
        }
    }

    #[test]
    fn test_roundtrip() {
        let entry = sample_entry();
        let mut buf = Vec::new();
        encode_entry(&entry, &mut buf);
        let decoded = decode_entry(&buf, 0).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_roundtrip_at_offset() {
        let entry = sample_entry();
        let mut buf = vec![0xAA; 17]; // leading junk the offset skips
        encode_entry(&entry, &mut buf);
        let decoded = decode_entry(&buf, 17).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_roundtrip_minimal() {
        let entry = Entry {
            name: "a".into(),
            pronunciation: String::new(),
            meaning_groups: vec![],
            info: String::new(),
            source: String::new(),
        };
        let mut buf = Vec::new();
        encode_entry(&entry, &mut buf);
        assert_eq!(decode_entry(&buf, 0).unwrap(), entry);
    }

    #[test]
    fn test_truncated_record() {
        let entry = sample_entry();
        let mut buf = Vec::new();
        encode_entry(&entry, &mut buf);
        for cut in [1, buf.len() / 2, buf.len() - 1] {
            assert!(decode_entry(&buf[..cut], 0).is_err(), "cut at {}", cut);
        }
    }

    #[test]
    fn test_bad_offset() {
        let mut buf = Vec::new();
        encode_entry(&sample_entry(), &mut buf);
        assert!(decode_entry(&buf, buf.len() + 1).is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        // name declared as 2 bytes of invalid UTF-8
        let buf = [0, 0, 0, 2, 0xff, 0xfe];
        assert!(decode_entry(&buf, 0).is_err());
    }

    #[test]
    fn test_meaning_count() {
        assert_eq!(sample_entry().meaning_count(), 3);
    }
}
