//! Top-level error type for lectern.
//!
//! The retrieval engine itself (segmenter, index, position mapper, context
//! assembler) has no error surface: malformed input degrades through
//! fallback tiers to a weaker but valid result. Errors only exist at the
//! acquisition and persistence boundary, and each of those subsystems
//! defines its own diagnostic type; this enum wraps them transparently so
//! error codes and help text survive to the user.

use miette::Diagnostic;
use thiserror::Error;

use crate::archive::ArchiveError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;

/// Top-level error for lectern operations.
#[derive(Debug, Error, Diagnostic)]
pub enum LecternError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience alias for lectern results.
pub type LecternResult<T> = std::result::Result<T, LecternError>;
