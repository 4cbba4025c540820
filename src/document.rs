//! Core data types for segmented book text.
//!
//! A `Document` is the complete segmentation result for one book: an ordered
//! chapter list plus a precomputed aggregate word count. It is built once by
//! the segmenter, owned by the caller (typically cached in the
//! [`ReadingCatalog`](crate::catalog::ReadingCatalog)), and replaced wholesale
//! if the underlying raw text changes. Nothing mutates it in place.

use serde::{Deserialize, Serialize};

use crate::normalize::word_count;

/// A titled, ordered span of a book's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Stable identifier, namespaced by the owning document (`{doc}:ch:{n}`).
    pub id: String,
    /// Heading derived from a detected marker, or a synthetic label
    /// ("Section 3", "Part 2", "Full Text").
    pub title: String,
    /// Full text content. May be empty (an empty span between two adjacent
    /// markers is retained so ordering stays dense).
    pub content: String,
    /// Zero-based position in reading order. Dense and unique within a
    /// document.
    pub index: usize,
    /// Whitespace-delimited token count of `content`.
    pub word_count: usize,
}

impl Chapter {
    /// Build a chapter, deriving its word count from the content.
    pub fn new(doc_id: &str, index: usize, title: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let word_count = word_count(&content);
        Self {
            id: format!("{doc_id}:ch:{index}"),
            title: title.into(),
            content,
            index,
            word_count,
        }
    }
}

/// The complete segmented result for one book.
///
/// Invariants, enforced at construction:
/// - chapter indices are contiguous from 0 in reading order;
/// - `total_word_count` equals the sum of per-chapter word counts;
/// - the chapter list is never empty (the segmenter's whole-text fallback
///   guarantees at least one chapter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    id: String,
    title: Option<String>,
    author: Option<String>,
    chapters: Vec<Chapter>,
    total_word_count: usize,
}

impl Document {
    /// Assemble a document from segmenter output.
    ///
    /// Chapters are re-indexed densely from 0 in the order given (any
    /// filtering upstream must not leave index gaps behind), and ids are
    /// rewritten to match.
    pub fn new(id: impl Into<String>, chapters: Vec<Chapter>) -> Self {
        let id = id.into();
        let chapters: Vec<Chapter> = chapters
            .into_iter()
            .enumerate()
            .map(|(i, ch)| Chapter {
                id: format!("{id}:ch:{i}"),
                index: i,
                ..ch
            })
            .collect();
        let total_word_count = chapters.iter().map(|c| c.word_count).sum();
        Self {
            id,
            title: None,
            author: None,
            chapters,
            total_word_count,
        }
    }

    /// Attach pass-through title/author metadata from the caller.
    pub fn with_metadata(mut self, title: Option<String>, author: Option<String>) -> Self {
        self.title = title;
        self.author = author;
        self
    }

    /// Document identifier (the namespace of its chapter ids).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Book title, if the caller supplied one.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Book author, if the caller supplied one.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// All chapters in reading order. Always the full set.
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Chapter at a given order index.
    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    /// Number of chapters.
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Aggregate word count, precomputed at construction.
    pub fn total_word_count(&self) -> usize {
        self.total_word_count
    }

    /// Concatenated text of every chapter whose order index is at most
    /// `last_index`, joined with a blank line.
    ///
    /// This is the spoiler-boundary primitive: the context assembler never
    /// reads chapter text any other way. A `last_index` beyond the final
    /// chapter clamps to the full document.
    pub fn text_through(&self, last_index: usize) -> String {
        self.chapters
            .iter()
            .filter(|c| c.index <= last_index)
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::new(
            "tale",
            vec![
                Chapter::new("tale", 0, "CHAPTER I", "It was the best of times."),
                Chapter::new("tale", 1, "CHAPTER II", "It was the worst of times."),
                Chapter::new("tale", 2, "CHAPTER III", "It was the age of wisdom."),
            ],
        )
    }

    #[test]
    fn indices_are_dense_and_ids_namespaced() {
        // Feed chapters with wrong indices; construction must re-densify.
        let d = Document::new(
            "b",
            vec![
                Chapter::new("x", 7, "A", "one"),
                Chapter::new("y", 3, "B", "two three"),
            ],
        );
        let idx: Vec<usize> = d.chapters().iter().map(|c| c.index).collect();
        assert_eq!(idx, vec![0, 1]);
        assert_eq!(d.chapters()[0].id, "b:ch:0");
        assert_eq!(d.chapters()[1].id, "b:ch:1");
    }

    #[test]
    fn total_equals_sum_of_chapters() {
        let d = doc();
        let sum: usize = d.chapters().iter().map(|c| c.word_count).sum();
        assert_eq!(d.total_word_count(), sum);
        assert_eq!(d.total_word_count(), 18);
    }

    #[test]
    fn text_through_joins_with_blank_line() {
        let d = doc();
        assert_eq!(
            d.text_through(1),
            "It was the best of times.\n\nIt was the worst of times."
        );
    }

    #[test]
    fn text_through_clamps_beyond_last() {
        let d = doc();
        assert_eq!(d.text_through(999), d.text_through(2));
    }

    #[test]
    fn text_through_zero_is_first_chapter_only() {
        let d = doc();
        assert_eq!(d.text_through(0), "It was the best of times.");
    }

    #[test]
    fn metadata_passthrough() {
        let d = doc().with_metadata(Some("A Tale of Two Cities".into()), Some("Dickens".into()));
        assert_eq!(d.title(), Some("A Tale of Two Cities"));
        assert_eq!(d.author(), Some("Dickens"));
    }

    #[test]
    fn json_roundtrip_preserves_everything() {
        let d = doc().with_metadata(Some("Tale".into()), None);
        let json = serde_json::to_string(&d).unwrap();
        let restored: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, d);
    }
}
