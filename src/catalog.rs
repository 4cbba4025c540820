//! Persistent reading catalog backed by `catalog.json`.
//!
//! The catalog is the caller-owned cache the segmenter's output lives in:
//! segmentation is deterministic and side-effect-free, so a Document is
//! computed once, stored here, and only replaced when the raw source text
//! changes. Layout under the catalog directory:
//!
//! - `catalog.json`: one record per book
//! - `documents/{id}.json`: the cached segmented Document
//! - `fragments/{id}.json`: scanned passages captured for the book

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::context::ContextFragment;
use crate::document::Document;

/// Errors from catalog operations.
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("book not found: \"{id}\"")]
    #[diagnostic(
        code(lectern::catalog::not_found),
        help("No book with this id exists in the catalog. List books with `lectern list`.")
    )]
    BookNotFound { id: String },

    #[error("catalog I/O error: {message}")]
    #[diagnostic(
        code(lectern::catalog::io),
        help(
            "Failed to read or write catalog data. Check that the data directory \
             exists and has correct permissions."
        )
    )]
    Io { message: String },
}

/// Convenience alias for catalog operation results.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Persistent record for one book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRecord {
    /// URL-safe slug identifier (e.g. "a-tale-of-two-cities").
    pub id: String,
    /// Title passed through from the archive or the user.
    pub title: Option<String>,
    /// Author passed through from the archive or the user.
    pub author: Option<String>,
    /// Where the raw text came from (archive URL or local path).
    pub source: Option<String>,
    /// Chapter count of the cached Document.
    pub chapter_count: usize,
    /// Total word count of the cached Document.
    pub total_word_count: usize,
    /// When the Document was cached (seconds since UNIX epoch).
    pub cached_at: u64,
}

/// Persistent index of all books plus their cached Documents and fragments.
pub struct ReadingCatalog {
    dir: PathBuf,
    records: Vec<BookRecord>,
}

impl ReadingCatalog {
    /// Open or create a catalog at the given directory.
    pub fn open(dir: &Path) -> CatalogResult<Self> {
        let path = dir.join("catalog.json");

        let records = if path.exists() {
            let data = std::fs::read_to_string(&path).map_err(|e| CatalogError::Io {
                message: format!("read {}: {e}", path.display()),
            })?;
            serde_json::from_str(&data).map_err(|e| CatalogError::Io {
                message: format!("parse {}: {e}", path.display()),
            })?
        } else {
            Vec::new()
        };

        Ok(Self {
            dir: dir.to_path_buf(),
            records,
        })
    }

    /// Flush the record index to disk.
    fn flush(&self) -> CatalogResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CatalogError::Io {
            message: format!("create dir {}: {e}", self.dir.display()),
        })?;
        let path = self.dir.join("catalog.json");
        let json = serde_json::to_string_pretty(&self.records).map_err(|e| CatalogError::Io {
            message: format!("serialize catalog: {e}"),
        })?;
        std::fs::write(&path, json).map_err(|e| CatalogError::Io {
            message: format!("write {}: {e}", path.display()),
        })
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.dir.join("documents").join(format!("{id}.json"))
    }

    fn fragments_path(&self, id: &str) -> PathBuf {
        self.dir.join("fragments").join(format!("{id}.json"))
    }

    /// Cache a segmented Document, replacing any previous one wholesale.
    ///
    /// The chapter set of a book is never edited incrementally: a re-download
    /// re-segments and overwrites the whole Document, and the record follows.
    pub fn store_document(
        &mut self,
        document: &Document,
        source: Option<String>,
    ) -> CatalogResult<()> {
        let doc_dir = self.dir.join("documents");
        std::fs::create_dir_all(&doc_dir).map_err(|e| CatalogError::Io {
            message: format!("create dir {}: {e}", doc_dir.display()),
        })?;

        let path = self.document_path(document.id());
        let json = serde_json::to_string(document).map_err(|e| CatalogError::Io {
            message: format!("serialize document \"{}\": {e}", document.id()),
        })?;
        std::fs::write(&path, json).map_err(|e| CatalogError::Io {
            message: format!("write {}: {e}", path.display()),
        })?;

        let record = BookRecord {
            id: document.id().to_string(),
            title: document.title().map(str::to_string),
            author: document.author().map(str::to_string),
            source,
            chapter_count: document.chapter_count(),
            total_word_count: document.total_word_count(),
            cached_at: now_epoch_secs(),
        };

        self.records.retain(|r| r.id != record.id);
        self.records.push(record);
        self.flush()?;

        info!(id = document.id(), chapters = document.chapter_count(), "cached document");
        Ok(())
    }

    /// Load a cached Document.
    pub fn load_document(&self, id: &str) -> CatalogResult<Document> {
        let path = self.document_path(id);
        if !path.exists() {
            return Err(CatalogError::BookNotFound { id: id.into() });
        }
        let data = std::fs::read_to_string(&path).map_err(|e| CatalogError::Io {
            message: format!("read {}: {e}", path.display()),
        })?;
        serde_json::from_str(&data).map_err(|e| CatalogError::Io {
            message: format!("parse {}: {e}", path.display()),
        })
    }

    /// Append a scanned passage for a book.
    ///
    /// Fragments do not require a cached Document; they are exactly the
    /// fallback path for books whose text never downloaded.
    pub fn add_fragment(&self, id: &str, fragment: ContextFragment) -> CatalogResult<()> {
        let mut fragments = self.fragments(id)?;
        fragments.push(fragment);

        let frag_dir = self.dir.join("fragments");
        std::fs::create_dir_all(&frag_dir).map_err(|e| CatalogError::Io {
            message: format!("create dir {}: {e}", frag_dir.display()),
        })?;
        let path = self.fragments_path(id);
        let json = serde_json::to_string_pretty(&fragments).map_err(|e| CatalogError::Io {
            message: format!("serialize fragments for \"{id}\": {e}"),
        })?;
        std::fs::write(&path, json).map_err(|e| CatalogError::Io {
            message: format!("write {}: {e}", path.display()),
        })
    }

    /// All scanned passages for a book, in capture order. Empty if none.
    pub fn fragments(&self, id: &str) -> CatalogResult<Vec<ContextFragment>> {
        let path = self.fragments_path(id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&path).map_err(|e| CatalogError::Io {
            message: format!("read {}: {e}", path.display()),
        })?;
        serde_json::from_str(&data).map_err(|e| CatalogError::Io {
            message: format!("parse {}: {e}", path.display()),
        })
    }

    /// Remove a book: record, cached Document, and fragments.
    pub fn remove(&mut self, id: &str) -> CatalogResult<BookRecord> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| CatalogError::BookNotFound { id: id.into() })?;
        let record = self.records.remove(pos);
        self.flush()?;

        // Cached files are best-effort cleanup; a missing file is fine.
        let _ = std::fs::remove_file(self.document_path(id));
        let _ = std::fs::remove_file(self.fragments_path(id));

        Ok(record)
    }

    /// Look up a book record by id.
    pub fn get(&self, id: &str) -> Option<&BookRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// All book records.
    pub fn list(&self) -> &[BookRecord] {
        &self.records
    }

    /// Number of books in the catalog.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Generate a URL-safe slug from a title string.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{segment, SegmentConfig};

    fn sample_document(id: &str, raw: &str) -> Document {
        segment(raw, id, &SegmentConfig::default())
    }

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("A Tale of Two Cities"), "a-tale-of-two-cities");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
        assert_eq!(slugify("Mrs. Dalloway!"), "mrs-dalloway");
    }

    #[test]
    fn store_and_load_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut catalog = ReadingCatalog::open(dir.path()).unwrap();

        let doc = sample_document("tale", "CHAPTER I\nBest of times.\nCHAPTER II\nWorst of times.")
            .with_metadata(Some("A Tale of Two Cities".into()), Some("Dickens".into()));
        catalog.store_document(&doc, Some("https://example.org/98".into())).unwrap();

        let restored = catalog.load_document("tale").unwrap();
        assert_eq!(restored, doc);

        let record = catalog.get("tale").unwrap();
        assert_eq!(record.chapter_count, 2);
        assert_eq!(record.title.as_deref(), Some("A Tale of Two Cities"));
    }

    #[test]
    fn restore_replaces_wholesale() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut catalog = ReadingCatalog::open(dir.path()).unwrap();

        let first = sample_document("b", "CHAPTER I\none\nCHAPTER II\ntwo");
        catalog.store_document(&first, None).unwrap();
        let second = sample_document("b", "CHAPTER I\nonly");
        catalog.store_document(&second, None).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("b").unwrap().chapter_count, 1);
        assert_eq!(catalog.load_document("b").unwrap(), second);
    }

    #[test]
    fn load_missing_document_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let catalog = ReadingCatalog::open(dir.path()).unwrap();
        let err = catalog.load_document("ghost").unwrap_err();
        assert!(matches!(err, CatalogError::BookNotFound { .. }));
    }

    #[test]
    fn fragments_roundtrip_in_capture_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let catalog = ReadingCatalog::open(dir.path()).unwrap();

        assert!(catalog.fragments("b").unwrap().is_empty());
        catalog.add_fragment("b", ContextFragment::new(5, "later")).unwrap();
        catalog.add_fragment("b", ContextFragment::unplaced("epigraph")).unwrap();

        let frags = catalog.fragments("b").unwrap();
        assert_eq!(frags.len(), 2);
        assert_eq!(frags[0].text, "later");
        assert_eq!(frags[1].page, 0);
    }

    #[test]
    fn remove_cleans_up_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut catalog = ReadingCatalog::open(dir.path()).unwrap();

        let doc = sample_document("gone", "CHAPTER I\ntext");
        catalog.store_document(&doc, None).unwrap();
        catalog.add_fragment("gone", ContextFragment::new(1, "f")).unwrap();

        let removed = catalog.remove("gone").unwrap();
        assert_eq!(removed.id, "gone");
        assert!(catalog.is_empty());
        assert!(matches!(
            catalog.load_document("gone").unwrap_err(),
            CatalogError::BookNotFound { .. }
        ));
        assert!(catalog.fragments("gone").unwrap().is_empty());
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();

        {
            let mut catalog = ReadingCatalog::open(dir.path()).unwrap();
            let doc = sample_document("keep", "CHAPTER I\nkept text");
            catalog.store_document(&doc, None).unwrap();
        }

        let catalog = ReadingCatalog::open(dir.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.load_document("keep").unwrap().chapter_count(), 1);
    }
}
