//! Optional TOML configuration for the CLI.
//!
//! Everything has a default; a config file only overrides what it names:
//!
//! ```toml
//! archive_url = "https://gutendex.example"
//!
//! [segmenter]
//! chunk_words = 4000
//! extra_markers = ['(?m)^CANTO\s+[IVXLCDM]+\b.*$']
//! ```

use std::path::Path;

use miette::Diagnostic;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::archive::DEFAULT_ARCHIVE_URL;
use crate::segment::SegmentConfig;

/// Errors from configuration loading.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {message}")]
    #[diagnostic(
        code(lectern::config::read),
        help("Check that the path exists and is readable.")
    )]
    Read { path: String, message: String },

    #[error("invalid config file {path}: {message}")]
    #[diagnostic(
        code(lectern::config::parse),
        help("The file must be valid TOML; see the module docs for the accepted keys.")
    )]
    Parse { path: String, message: String },

    #[error("invalid extra marker pattern \"{pattern}\": {message}")]
    #[diagnostic(
        code(lectern::config::bad_marker),
        help(
            "Extra markers are regular expressions; line-anchored multiline patterns \
             like '(?m)^CANTO\\s+[IVXLCDM]+\\b.*$' work best."
        )
    )]
    BadMarker { pattern: String, message: String },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LecternConfig {
    /// Archive API root; defaults to the public Gutendex instance.
    pub archive_url: Option<String>,
    /// Segmenter tuning.
    pub segmenter: SegmenterSection,
}

/// `[segmenter]` section, mirroring [`SegmentConfig`] with patterns as
/// strings so they can live in TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterSection {
    pub chunk_words: usize,
    pub min_section_chars: usize,
    pub min_sections: usize,
    pub extra_markers: Vec<String>,
}

impl Default for SegmenterSection {
    fn default() -> Self {
        let defaults = SegmentConfig::default();
        Self {
            chunk_words: defaults.chunk_words,
            min_section_chars: defaults.min_section_chars,
            min_sections: defaults.min_sections,
            extra_markers: Vec::new(),
        }
    }
}

impl LecternConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&data).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Archive API root to use.
    pub fn archive_url(&self) -> &str {
        self.archive_url.as_deref().unwrap_or(DEFAULT_ARCHIVE_URL)
    }

    /// Compile the segmenter section into a [`SegmentConfig`].
    pub fn segment_config(&self) -> ConfigResult<SegmentConfig> {
        let extra_markers = self
            .segmenter
            .extra_markers
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::BadMarker {
                    pattern: p.clone(),
                    message: e.to_string(),
                })
            })
            .collect::<ConfigResult<Vec<Regex>>>()?;

        Ok(SegmentConfig {
            chunk_words: self.segmenter.chunk_words,
            min_section_chars: self.segmenter.min_section_chars,
            min_sections: self.segmenter.min_sections,
            extra_markers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_segment_config() {
        let config = LecternConfig::default();
        let sc = config.segment_config().unwrap();
        let defaults = SegmentConfig::default();
        assert_eq!(sc.chunk_words, defaults.chunk_words);
        assert_eq!(sc.min_section_chars, defaults.min_section_chars);
        assert_eq!(sc.min_sections, defaults.min_sections);
        assert!(sc.extra_markers.is_empty());
        assert_eq!(config.archive_url(), DEFAULT_ARCHIVE_URL);
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let config: LecternConfig = toml::from_str(
            r#"
            [segmenter]
            chunk_words = 4000
            "#,
        )
        .unwrap();
        assert_eq!(config.segmenter.chunk_words, 4000);
        assert_eq!(
            config.segmenter.min_section_chars,
            SegmentConfig::default().min_section_chars
        );
    }

    #[test]
    fn extra_markers_compile() {
        let config: LecternConfig = toml::from_str(
            r#"
            [segmenter]
            extra_markers = ['(?m)^CANTO\s+[IVXLCDM]+\b.*$']
            "#,
        )
        .unwrap();
        let sc = config.segment_config().unwrap();
        assert_eq!(sc.extra_markers.len(), 1);
        assert!(sc.extra_markers[0].is_match("CANTO III\n"));
    }

    #[test]
    fn bad_marker_is_reported_with_its_pattern() {
        let config: LecternConfig = toml::from_str(
            r#"
            [segmenter]
            extra_markers = ['(unclosed']
            "#,
        )
        .unwrap();
        let err = config.segment_config().unwrap_err();
        assert!(matches!(err, ConfigError::BadMarker { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn archive_url_override() {
        let config: LecternConfig =
            toml::from_str(r#"archive_url = "https://mirror.example""#).unwrap();
        assert_eq!(config.archive_url(), "https://mirror.example");
    }
}
