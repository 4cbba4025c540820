//! Chapter segmentation: raw archive text → ordered chapter list.
//!
//! Book text obtained from public archives has no reliable structure, so
//! segmentation is a ladder of fallback tiers, tried in strict priority
//! order. The first tier that produces chapters wins:
//!
//! 1. **Marker patterns** ([`markers`]): heading lines like `CHAPTER IV`.
//! 2. **Blank runs**: three or more consecutive newlines as section breaks.
//! 3. **Fixed chunks**: groups of `chunk_words` whitespace tokens.
//! 4. **Whole text**: one chapter containing everything.
//!
//! Segmentation never fails: an unsegmentable input (even an empty string)
//! still yields a single-chapter document. The result is a pure function of
//! the input, so callers may cache it and only recompute when the raw text
//! changes.

pub mod markers;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::document::{Chapter, Document};
use crate::normalize;

/// Tuning knobs for the fallback tiers.
///
/// Defaults reproduce the behavior book-length prose was calibrated against;
/// `extra_markers` lets a caller add heading patterns for texts the built-in
/// table mis-segments. Extra patterns are tried before the built-ins.
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// Words per chapter in the fixed-chunking tier.
    pub chunk_words: usize,
    /// A blank-run section qualifies once its trimmed length exceeds this
    /// many characters.
    pub min_section_chars: usize,
    /// Fewest qualifying blank-run sections for tier 2 to apply.
    pub min_sections: usize,
    /// User-supplied marker patterns, highest priority first.
    pub extra_markers: Vec<Regex>,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            chunk_words: 5000,
            min_section_chars: 100,
            min_sections: 6,
            extra_markers: Vec::new(),
        }
    }
}

/// A titled span produced by one tier, before chapter ids are assigned.
type Span = (String, String);

/// Segment raw text into a [`Document`] with id `doc_id`.
///
/// Always succeeds. Carriage returns are stripped and the text is NFC-
/// normalized before any pattern runs, so CRLF input segments identically to
/// LF input.
pub fn segment(raw: &str, doc_id: &str, config: &SegmentConfig) -> Document {
    let text = normalize::prepare(raw);

    let spans = by_markers(&text, config)
        .or_else(|| by_blank_runs(&text, config))
        .or_else(|| by_word_chunks(&text, config))
        .unwrap_or_else(|| vec![("Full Text".to_string(), text.clone())]);

    let chapters: Vec<Chapter> = spans
        .into_iter()
        .enumerate()
        .map(|(i, (title, content))| Chapter::new(doc_id, i, title, content))
        .collect();

    let document = Document::new(doc_id, chapters);
    info!(
        doc_id,
        chapters = document.chapter_count(),
        words = document.total_word_count(),
        "segmented document"
    );
    document
}

// ── Tier 1: marker patterns ─────────────────────────────────────────────

/// Try each marker pattern in priority order; the first with at least one
/// match anywhere in the text is used exclusively.
///
/// Every match position becomes a chapter boundary: the matched heading
/// (trimmed) is the title, and the content runs from just after the heading
/// to just before the next one. Material before the first match is front
/// matter and is discarded. An empty span between adjacent markers is kept
/// so chapter ordering stays dense.
fn by_markers(text: &str, config: &SegmentConfig) -> Option<Vec<Span>> {
    let mut patterns: Vec<&Regex> = config.extra_markers.iter().collect();
    for builtin in markers::builtin_markers() {
        patterns.push(builtin);
    }

    for pattern in patterns {
        let matches: Vec<regex::Match<'_>> = pattern.find_iter(text).collect();
        if matches.is_empty() {
            continue;
        }
        debug!(
            pattern = pattern.as_str(),
            matches = matches.len(),
            "marker pattern selected"
        );

        let mut spans = Vec::with_capacity(matches.len());
        for (i, m) in matches.iter().enumerate() {
            let content_end = matches.get(i + 1).map_or(text.len(), |next| next.start());
            let title = m.as_str().trim().to_string();
            let content = text[m.end()..content_end].trim().to_string();
            spans.push((title, content));
        }
        return Some(spans);
    }

    None
}

// ── Tier 2: blank-run sections ──────────────────────────────────────────

static RE_BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Split on runs of three or more newlines. Applies only when the text has
/// enough substantial sections to be worth keeping as structure; otherwise
/// the split is noise and the fixed-chunk tier takes over.
fn by_blank_runs(text: &str, config: &SegmentConfig) -> Option<Vec<Span>> {
    let sections: Vec<&str> = RE_BLANK_RUN
        .split(text)
        .map(str::trim)
        .filter(|s| s.chars().count() > config.min_section_chars)
        .collect();

    if sections.len() < config.min_sections {
        return None;
    }
    debug!(sections = sections.len(), "blank-run tier selected");

    Some(
        sections
            .iter()
            .enumerate()
            .map(|(i, s)| (format!("Section {}", i + 1), s.to_string()))
            .collect(),
    )
}

// ── Tier 3: fixed-size chunks ───────────────────────────────────────────

/// Group whitespace tokens into consecutive `chunk_words`-sized chapters,
/// rejoined with single spaces. The final chunk may be shorter. Produces
/// nothing for whitespace-only input, handing off to the whole-text fallback.
fn by_word_chunks(text: &str, config: &SegmentConfig) -> Option<Vec<Span>> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    let size = config.chunk_words.max(1);
    debug!(words = words.len(), chunk_words = size, "fixed-chunk tier selected");

    Some(
        words
            .chunks(size)
            .enumerate()
            .map(|(i, chunk)| (format!("Part {}", i + 1), chunk.join(" ")))
            .collect(),
    )
}
