//! # lectern
//!
//! Reading companion engine: turns raw public-archive book text into an
//! ordered chapter structure and assembles spoiler-safe reading context for
//! downstream AI explanation.
//!
//! ## Architecture
//!
//! - **Segmenter** (`segment`): layered fallback tiers that never fail,
//!   from marker patterns down to a whole-text chapter
//! - **Document** (`document`): immutable chapter index with precomputed
//!   word-count totals
//! - **Position mapper** (`position`): page fraction → chapter ordinal via
//!   proportional word-count distribution
//! - **Context assembler** (`context`): spoiler-bounded text, chapter path
//!   first, page-stamped fragments as fallback
//! - **Archive client** (`archive`): plain-text acquisition from a
//!   Gutendex-style API
//! - **Catalog** (`catalog`): explicit caller-owned cache of segmented
//!   Documents
//!
//! ## Library usage
//!
//! ```
//! use lectern::context;
//! use lectern::position::chapter_for_page;
//! use lectern::segment::{segment, SegmentConfig};
//!
//! let doc = segment(
//!     "CHAPTER I\nCall me Ishmael.\nCHAPTER II\nSome days later.",
//!     "moby-dick",
//!     &SegmentConfig::default(),
//! );
//! assert_eq!(doc.chapter_count(), 2);
//!
//! let ordinal = chapter_for_page(&doc, 1, 2);
//! let visible = context::assemble(Some(&doc), Some(ordinal), &[], 1);
//! assert!(visible.contains("Ishmael"));
//! ```

pub mod archive;
pub mod catalog;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod normalize;
pub mod position;
pub mod segment;

pub use document::{Chapter, Document};
pub use error::{LecternError, LecternResult};
