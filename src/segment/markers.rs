//! Ordered chapter-marker pattern table.
//!
//! Each pattern matches one heading line in a public-domain transcription.
//! The table order IS the priority order: the segmenter tries patterns one at
//! a time and the first with at least one match anywhere in the text wins
//! exclusively. Matches from lower-priority patterns are never mixed in.
//!
//! New marker styles are added here, not in the segmenter's control flow.

use std::sync::LazyLock;

use regex::Regex;

// ── Marker patterns, highest priority first ─────────────────────────────

/// `CHAPTER` in caps followed by a Roman or Arabic numeral.
static RE_CHAPTER_CAPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^CHAPTER\s+(?:[0-9]+|[IVXLCDM]+)\b.*$").unwrap());

/// Any-case variant, for transcriptions that use "Chapter 1" headings.
static RE_CHAPTER_ANY_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^CHAPTER\s+(?:[0-9]+|[IVXLCDM]+)\b.*$").unwrap());

/// `BOOK` divisions, common in multi-volume works.
static RE_BOOK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^BOOK\s+(?:[0-9]+|[IVXLCDM]+)\b.*$").unwrap());

/// A line consisting solely of three asterisks, used as a scene/section
/// divider in some transcriptions.
static RE_ASTERISK_DIVIDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\*\s?\*\s?\*\s*$").unwrap());

/// The built-in marker table in priority order.
pub fn builtin_markers() -> [&'static Regex; 4] {
    [
        &RE_CHAPTER_CAPS,
        &RE_CHAPTER_ANY_CASE,
        &RE_BOOK,
        &RE_ASTERISK_DIVIDER,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_pattern_matches_roman_and_arabic() {
        assert!(RE_CHAPTER_CAPS.is_match("CHAPTER I\n"));
        assert!(RE_CHAPTER_CAPS.is_match("CHAPTER 12. The Return\n"));
        assert!(!RE_CHAPTER_CAPS.is_match("Chapter 12\n"));
        assert!(!RE_CHAPTER_CAPS.is_match("CHAPTER the first\n"));
    }

    #[test]
    fn caps_pattern_is_line_anchored() {
        assert!(!RE_CHAPTER_CAPS.is_match("see CHAPTER II for details"));
        assert!(RE_CHAPTER_CAPS.is_match("intro\nCHAPTER II\nmore"));
    }

    #[test]
    fn any_case_matches_mixed() {
        assert!(RE_CHAPTER_ANY_CASE.is_match("Chapter iv\n"));
        assert!(RE_CHAPTER_ANY_CASE.is_match("chapter 3\n"));
    }

    #[test]
    fn book_pattern() {
        assert!(RE_BOOK.is_match("BOOK II\n"));
        assert!(RE_BOOK.is_match("Book 1: The Shire\n"));
        assert!(!RE_BOOK.is_match("a book about\n"));
    }

    #[test]
    fn asterisk_divider_is_exact() {
        assert!(RE_ASTERISK_DIVIDER.is_match("* * *"));
        assert!(RE_ASTERISK_DIVIDER.is_match("  ***  "));
        assert!(!RE_ASTERISK_DIVIDER.is_match("**"));
        assert!(!RE_ASTERISK_DIVIDER.is_match("**** note ****"));
    }
}
