//! Configuration loading for the translation core.
//!
//! All tunables are centralized here and loaded from a TOML file if
//! present. Any missing or invalid entries fall back to sensible defaults
//! so a reader can always start translating.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Chunking and translation settings; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranslationConfig {
    /// Language of the book text; "auto" lets the engine detect it.
    #[serde(default = "default_source_language")]
    pub source_language: String,
    #[serde(default = "default_target_language")]
    pub target_language: String,
    /// How many consecutive pages are batched into one translation unit.
    #[serde(default = "default_pages_per_chunk")]
    pub pages_per_chunk: usize,
    /// Wrap pages with boundary markers (exact round trip when the engine
    /// keeps them) instead of relying on byte offsets plus the paragraph
    /// heuristic.
    #[serde(default = "default_use_markers")]
    pub use_markers: bool,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        TranslationConfig {
            source_language: default_source_language(),
            target_language: default_target_language(),
            pages_per_chunk: default_pages_per_chunk(),
            use_markers: default_use_markers(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// Load configuration from `path`, falling back to defaults when the file
/// is missing or malformed.
pub fn load_config(path: &Path) -> TranslationConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded translation config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default translation config: {err}"
            );
            return TranslationConfig::default();
        }
    };

    match toml::from_str::<TranslationConfig>(&contents) {
        Ok(cfg) => {
            debug!("Parsed translation configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid translation config TOML: {err}");
            TranslationConfig::default()
        }
    }
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_pages_per_chunk() -> usize {
    3
}

fn default_use_markers() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    crate::cache::DEFAULT_CAPACITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load_config(Path::new("conf/does-not-exist.toml"));
        assert_eq!(cfg.source_language, "auto");
        assert_eq!(cfg.pages_per_chunk, 3);
        assert!(cfg.use_markers);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let cfg: TranslationConfig =
            toml::from_str("target_language = \"de\"\npages_per_chunk = 5").unwrap();
        assert_eq!(cfg.target_language, "de");
        assert_eq!(cfg.pages_per_chunk, 5);
        assert_eq!(cfg.source_language, "auto");
        assert_eq!(cfg.cache_capacity, crate::cache::DEFAULT_CAPACITY);
    }
}
