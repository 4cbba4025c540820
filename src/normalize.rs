//! Raw-text preparation before segmentation.
//!
//! Archive transcriptions arrive with mixed line endings and occasionally
//! decomposed Unicode. Marker scanning assumes `\n`-only line boundaries and
//! NFC-composed text, so every raw string passes through here exactly once,
//! at the segmentation entry point.

use unicode_normalization::UnicodeNormalization;

/// Prepare raw archive text for marker scanning.
///
/// Strips carriage returns (CRLF and bare CR are both noise in public-domain
/// transcriptions) and recomposes to NFC.
pub fn prepare(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|&c| c != '\r').collect();
    stripped.nfc().collect()
}

/// Whitespace-delimited token count.
///
/// This is the word-count definition used everywhere in the engine: chapter
/// word counts, document totals, and the position mapper's cumulative walk
/// all agree on it.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
