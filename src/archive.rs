//! Raw-text acquisition from a public book archive.
//!
//! Talks to a Gutendex-style JSON API: work metadata carries a `formats` map
//! from MIME type to download URL, and we only ever want a plain-text
//! edition. This is the engine's sole failure surface: a work with no
//! downloadable text version is reported upward as [`ArchiveError::NoTextVersion`]
//! and is never retried automatically; the caller decides whether to retry
//! or offer a manual alternative.

use std::io::Read;
use std::time::Duration;

use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

/// Default archive API root (Gutendex, the Project Gutenberg index).
pub const DEFAULT_ARCHIVE_URL: &str = "https://gutendex.com";

/// Request timeout for metadata and text downloads.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum accepted size for a downloaded text edition (32 MB, well above
/// any realistic book, small enough to stop a runaway response).
const MAX_TEXT_BYTES: u64 = 32 * 1024 * 1024;

/// Errors from archive acquisition.
#[derive(Debug, Error, Diagnostic)]
pub enum ArchiveError {
    #[error("no downloadable text version exists for work {id}")]
    #[diagnostic(
        code(lectern::archive::no_text_version),
        help(
            "The archive lists this work, but none of its formats is plain text. \
             Import the text manually with `lectern import` instead."
        )
    )]
    NoTextVersion { id: u64 },

    #[error("metadata fetch failed for work {id}: {message}")]
    #[diagnostic(
        code(lectern::archive::metadata),
        help("Check that the work id exists and the archive URL is reachable.")
    )]
    Metadata { id: u64, message: String },

    #[error("download failed for \"{url}\": {message}")]
    #[diagnostic(
        code(lectern::archive::download),
        help("The text edition URL could not be downloaded. Check network availability.")
    )]
    Download { url: String, message: String },

    #[error("text edition at \"{url}\" exceeds the {limit_mb} MB download limit")]
    #[diagnostic(
        code(lectern::archive::too_large),
        help("The linked file is unreasonably large for a text edition and was refused.")
    )]
    TooLarge { url: String, limit_mb: u64 },
}

/// Convenience alias for archive operation results.
pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;

/// A fetched work: raw text plus pass-through metadata.
#[derive(Debug, Clone)]
pub struct ArchiveBook {
    /// Archive work id.
    pub id: u64,
    /// Title as listed by the archive.
    pub title: Option<String>,
    /// First listed author, if any.
    pub author: Option<String>,
    /// The full raw text, undecoded beyond UTF-8 (lossy).
    pub text: String,
}

/// Synchronous client for a Gutendex-style archive API.
pub struct ArchiveClient {
    agent: ureq::Agent,
    base_url: String,
}

impl ArchiveClient {
    /// Client against a given API root (no trailing slash required).
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch a work's metadata and its plain-text edition.
    pub fn fetch_book(&self, id: u64) -> ArchiveResult<ArchiveBook> {
        let meta = self.metadata(id)?;

        let title = meta["title"].as_str().map(str::to_string);
        let author = meta["authors"][0]["name"].as_str().map(str::to_string);

        let url = plain_text_url(&meta).ok_or(ArchiveError::NoTextVersion { id })?;
        debug!(id, url = %url, "selected plain-text edition");

        let text = self.fetch_text(&url)?;
        info!(id, bytes = text.len(), "fetched archive text");

        Ok(ArchiveBook {
            id,
            title,
            author,
            text,
        })
    }

    /// Fetch and parse `{base}/books/{id}`.
    fn metadata(&self, id: u64) -> ArchiveResult<Value> {
        let url = format!("{}/books/{}", self.base_url, id);
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| ArchiveError::Metadata {
                id,
                message: e.to_string(),
            })?;
        response.into_json().map_err(|e| ArchiveError::Metadata {
            id,
            message: format!("invalid metadata JSON: {e}"),
        })
    }

    /// Download a text edition with a bounded read.
    pub fn fetch_text(&self, url: &str) -> ArchiveResult<String> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| ArchiveError::Download {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_TEXT_BYTES + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| ArchiveError::Download {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if bytes.len() as u64 > MAX_TEXT_BYTES {
            return Err(ArchiveError::TooLarge {
                url: url.to_string(),
                limit_mb: MAX_TEXT_BYTES / (1024 * 1024),
            });
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Pick the best plain-text edition URL from a work's `formats` map.
///
/// Preference order: `text/plain; charset=utf-8`, then any other `text/plain`
/// entry whose URL is not a zip container.
fn plain_text_url(meta: &Value) -> Option<String> {
    let formats = meta["formats"].as_object()?;

    if let Some(url) = formats
        .iter()
        .find(|(k, _)| k.starts_with("text/plain") && k.contains("utf-8"))
        .and_then(|(_, v)| v.as_str())
    {
        if !url.ends_with(".zip") {
            return Some(url.to_string());
        }
    }

    formats
        .iter()
        .filter(|(k, _)| k.starts_with("text/plain"))
        .filter_map(|(_, v)| v.as_str())
        .find(|url| !url.ends_with(".zip"))
        .map(str::to_string)
}
