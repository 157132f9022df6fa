//! Relevance ranking for matched entries.
//!
//! Entries matched through the index carry no inherent order, so results
//! are sorted by a fixed tie-break chain relative to the resolved term.
//! Each predicate is symmetric (it only separates two entries when exactly
//! one side satisfies it); ranking is implemented as a derived-`Ord` sort
//! key per entry, which makes the whole chain a strict weak ordering and
//! keeps identical input producing identical output on every run.

use crate::format::entry::{Entry, MeaningGroup};
use std::cmp::Reverse;

/// Sort key: fields compare in declaration order, and on every `bool`
/// field `false` ranks first. The original-case name is the final
/// deterministic tie-break.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct RankKey {
    /// Name is not exactly the term
    name_differs: bool,
    /// No meaning group has a word variant equal to the term
    no_variant_match: bool,
    /// Lowercased name is not the term
    head_differs: bool,
    /// Name changes under lowercasing (an abbreviation with capitals)
    abbreviation: bool,
    /// More meaning groups rank higher
    group_count: Reverse<usize>,
    /// More total meanings rank higher
    meaning_count: Reverse<usize>,
    /// Lowercased name does not start with the term
    no_prefix_match: bool,
    name: String,
}

fn rank_key(term: &str, entry: &Entry) -> RankKey {
    let head = entry.name.to_lowercase();
    RankKey {
        name_differs: entry.name != term,
        no_variant_match: !entry
            .meaning_groups
            .iter()
            .any(|group| has_variant_match(term, group)),
        head_differs: head != term,
        abbreviation: head != entry.name,
        group_count: Reverse(entry.meaning_groups.len()),
        meaning_count: Reverse(entry.meaning_count()),
        no_prefix_match: !head.starts_with(term),
        name: entry.name.clone(),
    }
}

/// Whether any word variant of the group equals the term, ignoring case.
fn has_variant_match(term: &str, group: &MeaningGroup) -> bool {
    group
        .word_variants
        .iter()
        .any(|variant| variant.to_lowercase() == term)
}

/// Order entries by relevance to `term`.
pub fn rank_entries(term: &str, entries: &mut Vec<Entry>) {
    let mut keyed: Vec<(RankKey, Entry)> = entries
        .drain(..)
        .map(|entry| (rank_key(term, &entry), entry))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    entries.extend(keyed.into_iter().map(|(_, entry)| entry));
}

/// Within one entry, move meaning groups with an exact word-variant match
/// ahead of those without (stable; no further tie-break).
pub fn rank_meaning_groups(term: &str, entry: &mut Entry) {
    entry
        .meaning_groups
        .sort_by_key(|group| !has_variant_match(term, group));
}

// ============================================================================
// Tests
// ============================================================================
