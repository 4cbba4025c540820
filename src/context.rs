//! Spoiler-bounded context assembly.
//!
//! Produces the single text blob the AI-query collaborator is allowed to
//! see. The contract is the spoiler boundary: the output never contains
//! chapter text past the reader's current chapter, nor scanned passages past
//! the reader's current page. Everything here is a pure read/transform over
//! caller-supplied values.

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// A discrete, page-stamped passage captured independently of segmentation
/// (e.g. scanned or typed in by hand).
///
/// `page == 0` is the explicit "unplaced" sentinel: a passage with no known
/// page number is treated as occurring at the very start of the book, so it
/// is always inside the spoiler boundary. This mirrors how readers use
/// unplaced captures (epigraphs, flyleaf quotes) and never risks leaking
/// later content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFragment {
    /// Page the passage was captured from; 0 when unknown.
    #[serde(default)]
    pub page: u32,
    /// The passage text.
    pub text: String,
}

impl ContextFragment {
    /// Fragment stamped with a known page number.
    pub fn new(page: u32, text: impl Into<String>) -> Self {
        Self {
            page,
            text: text.into(),
        }
    }

    /// Fragment with no page number, treated as earliest-available.
    pub fn unplaced(text: impl Into<String>) -> Self {
        Self {
            page: 0,
            text: text.into(),
        }
    }
}

/// Assemble the context a downstream AI query may see.
///
/// Strict precedence, never a merge: when the document path yields non-empty
/// text up to `current_chapter` (default 0), that text is returned verbatim
/// and the fragments are ignored; combining the two sources would send
/// duplicate or conflicting narrative context downstream. Only when the
/// document path is absent or empty do fragments apply: those with
/// `page <= current_page`, sorted ascending by page (stable for ties),
/// joined with a blank line.
///
/// Returns an empty string when neither path has content.
pub fn assemble(
    document: Option<&Document>,
    current_chapter: Option<usize>,
    fragments: &[ContextFragment],
    current_page: u32,
) -> String {
    if let Some(doc) = document {
        let text = doc.text_through(current_chapter.unwrap_or(0));
        if !text.is_empty() {
            return text;
        }
    }

    let mut visible: Vec<&ContextFragment> = fragments
        .iter()
        .filter(|f| f.page <= current_page)
        .collect();
    visible.sort_by_key(|f| f.page);

    visible
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
