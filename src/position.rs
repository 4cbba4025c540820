//! Page-position to chapter-ordinal estimation.
//!
//! The reader reports a page number out of an assumed total; chapters carry
//! word counts. Word count is a proxy for page layout, so the mapping is a
//! deterministic best-effort estimate, not an exact alignment: reading
//! progress is the page fraction, and the estimated chapter is the first one
//! whose cumulative word count reaches that fraction of the document.

use crate::document::Document;

/// Estimate which chapter a reader on `current_page` of `total_pages` is in.
///
/// Returns an order index that is always valid for `document`'s chapter
/// list. Degenerate inputs (zero total pages, chapterless document) map to
/// ordinal 0 rather than erroring; progress is clamped to [0.0, 1.0] so a
/// page count past the reported total saturates at the last chapter.
///
/// For a fixed document and total, the result never decreases as
/// `current_page` grows.
pub fn chapter_for_page(document: &Document, current_page: u32, total_pages: u32) -> usize {
    if total_pages == 0 || document.chapter_count() == 0 {
        return 0;
    }

    let progress = (f64::from(current_page) / f64::from(total_pages)).clamp(0.0, 1.0);
    let target_words = progress * document.total_word_count() as f64;

    let mut cumulative = 0usize;
    for chapter in document.chapters() {
        cumulative += chapter.word_count;
        if cumulative as f64 >= target_words {
            return chapter.index;
        }
    }

    // Rounding at the very end can leave the target just past the total.
    document.chapter_count() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chapter;

    /// Three chapters of 100 / 300 / 600 words.
    fn doc() -> Document {
        let words = |n: usize| vec!["w"; n].join(" ");
        Document::new(
            "d",
            vec![
                Chapter::new("d", 0, "One", words(100)),
                Chapter::new("d", 1, "Two", words(300)),
                Chapter::new("d", 2, "Three", words(600)),
            ],
        )
    }

    #[test]
    fn page_zero_is_first_chapter() {
        assert_eq!(chapter_for_page(&doc(), 0, 400), 0);
    }

    #[test]
    fn last_page_is_last_chapter() {
        assert_eq!(chapter_for_page(&doc(), 400, 400), 2);
    }

    #[test]
    fn proportional_interior_estimates() {
        let d = doc();
        // 10% of 1000 words = 100 → first chapter's cumulative count reaches it.
        assert_eq!(chapter_for_page(&d, 40, 400), 0);
        // 25% = 250 words → inside chapter 1's cumulative range (400).
        assert_eq!(chapter_for_page(&d, 100, 400), 1);
        // 75% = 750 words → chapter 2.
        assert_eq!(chapter_for_page(&d, 300, 400), 2);
    }

    #[test]
    fn zero_total_pages_degrades_to_zero() {
        assert_eq!(chapter_for_page(&doc(), 17, 0), 0);
    }

    #[test]
    fn page_past_total_saturates() {
        assert_eq!(chapter_for_page(&doc(), 9999, 400), 2);
    }

    #[test]
    fn monotone_in_current_page() {
        let d = doc();
        let mut last = 0;
        for page in 0..=400 {
            let ord = chapter_for_page(&d, page, 400);
            assert!(ord >= last, "ordinal decreased at page {page}");
            assert!(ord < d.chapter_count());
            last = ord;
        }
    }

    #[test]
    fn zero_word_document_stays_at_zero() {
        let d = Document::new("d", vec![Chapter::new("d", 0, "Full Text", "")]);
        assert_eq!(chapter_for_page(&d, 5, 10), 0);
    }
}
