//! Term normalization: canonicalize a raw query string into a lookup key.
//!
//! Index keys are produced by the same pipeline at dataset build time, so
//! lookup only works if the runtime normalizes identically, byte for byte:
//!
//! 1. NFKD decomposition (splits accents into base + combining marks and
//!    maps compatibility variants to canonical forms)
//! 2. Unicode-aware lowercasing
//! 3. A single character pass that folds typographic punctuation to ASCII,
//!    collapses whitespace and dash runs, expands a fixed set of ligatures,
//!    and drops everything outside `[a-z0-9 ',-._]` (including the bare
//!    combining marks left over from decomposition)
//! 4. Trim the single trailing space a collapsed run can leave behind
//!
//! The result may be empty. `normalize` is pure and idempotent.

use unicode_normalization::UnicodeNormalization;

/// Reduce a term to the limited ASCII character set used by index keys.
pub fn normalize(term: &str) -> String {
    let mut n = String::with_capacity(term.len());
    let mut last_space = true; // trims leading whitespace
    let mut last_dash = false;

    for c in term.nfkd().flat_map(char::to_lowercase) {
        let mut r = fold_punctuation(c);

        // collapse whitespace
        if r == ' ' || ('\u{09}'..='\u{0c}').contains(&r) {
            if last_space {
                continue;
            }
            last_space = true;
            r = ' ';
        } else {
            last_space = false;
        }

        // collapse dashes
        if r == '-' {
            if last_dash {
                continue;
            }
            last_dash = true;
        } else {
            last_dash = false;
        }

        // expand ligatures (bypasses the allow-list below)
        if let Some(expansion) = expand_ligature(r) {
            n.push_str(expansion);
            continue;
        }

        // remove unknown characters/diacritics
        // note: since we decomposed diacritics, this keeps the base char
        if matches!(r, 'a'..='z' | '0'..='9' | ' ' | '\'' | ',' | '-' | '.' | '_') {
            n.push(r);
        }
    }
    if last_space && !n.is_empty() {
        // trim trailing whitespace
        n.pop();
    }
    n
}

/// Replace smart punctuation with an ASCII approximation.
fn fold_punctuation(r: char) -> char {
    match r {
        '\u{00ab}' | '\u{00bb}' => '"',
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' => '-',
        '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{201b}' => '\'',
        '\u{201c}' | '\u{201d}' | '\u{201e}' | '\u{201f}' => '"',
        '\u{2024}' => '.',
        '\u{2032}' | '\u{2035}' => '\'',
        '\u{2033}' | '\u{2036}' => '"',
        '\u{2038}' => '^',
        '\u{2039}' | '\u{203a}' => '\'',
        '\u{204f}' => ';',
        _ => r,
    }
}

/// Fixed multi-letter expansions. Most ligatures are already decomposed by
/// NFKD; this covers the ones without a compatibility decomposition.
fn expand_ligature(r: char) -> Option<&'static str> {
    Some(match r {
        '\u{a74f}' => "oo",
        '\u{00df}' => "ss",
        '\u{00e6}' => "ae",
        '\u{0153}' => "oe",
        '\u{fb00}' => "ff",
        '\u{fb01}' => "fi",
        '\u{fb02}' => "fl",
        '\u{fb03}' => "ffi",
        '\u{fb04}' => "ffl",
        '\u{fb05}' => "ft",
        '\u{fb06}' => "st",
        _ => return None,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accents_and_case() {
        assert_eq!(normalize("CAFÉ"), "cafe");
        assert_eq!(normalize("naïve"), "naive");
        assert_eq!(normalize("Ångström"), "angstrom");
    }

    #[test]
    fn test_ligatures() {
        assert_eq!(normalize("ﬁre"), "fire");
        assert_eq!(normalize("straße"), "strasse");
        assert_eq!(normalize("æon"), "aeon");
        assert_eq!(normalize("œuvre"), "oeuvre");
        assert_eq!(normalize("diﬃcult"), "difficult");
    }

    #[test]
    fn test_smart_punctuation() {
        assert_eq!(normalize("don\u{2019}t"), "don't");
        assert_eq!(normalize("well\u{2013}known"), "well-known");
        assert_eq!(normalize("a\u{2014}b"), "a-b");
        // folded-to-ASCII chars outside the allow-list are then dropped
        assert_eq!(normalize("\u{00ab}word\u{00bb}"), "word");
    }

    #[test]
    fn test_whitespace_collapsing() {
        assert_eq!(normalize("a  b"), "a b");
        assert_eq!(normalize("a\t\n b"), "a b");
        assert_eq!(normalize("  leading"), "leading");
        assert_eq!(normalize("trailing   "), "trailing");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_dash_collapsing() {
        assert_eq!(normalize("a--b"), "a-b");
        assert_eq!(normalize("a---b"), "a-b");
        assert_eq!(normalize("a-b-c"), "a-b-c");
    }

    #[test]
    fn test_unknown_characters_dropped() {
        assert_eq!(normalize("a€b"), "ab");
        assert_eq!(normalize("☃"), "");
        assert_eq!(normalize("it's, ok._-"), "it's, ok._-");
    }

    #[test]
    fn test_empty_and_digits() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("route 66"), "route 66");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "CAFÉ",
            "naïve",
            "  spaced   out  ",
            "a--b—c",
            "don\u{2019}t ﬁt",
            "straße",
            "ꝏlong",
            "mixed €£¥ junk",
            "\u{2024}\u{2033}\u{204f}",
            "already normalized term",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "input: {:?}", s);
        }
    }

    #[test]
    fn test_output_character_set() {
        let allowed = |c: char| {
            matches!(c, 'a'..='z' | '0'..='9' | ' ' | '\'' | ',' | '-' | '.' | '_')
        };
        for s in ["Weiß–Blau", "ǅungla", "Ⅷ", "ﬁn de siècle", "２５"] {
            assert!(normalize(s).chars().all(allowed), "input: {:?}", s);
        }
    }
}
