// * Pipeline Settings
// * Every field falls back to the defaults in `constants`, so a TOML file only
// * needs to list the values it overrides.

use crate::config::constants::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Runtime configuration for the whole pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Model identifier passed to the local runtime
    pub model: String,
    /// Program used to reach the local model runtime
    pub model_program: String,
    pub model_timeout_secs: u64,
    pub chunk_size: usize,
    pub max_content_chars: usize,
    pub relevance_keywords: Vec<String>,
    /// Target number of clusters
    pub clusters: usize,
    pub max_entries_per_feed: usize,
    pub feed_timeout_secs: u64,
    pub include_openvc: bool,
    pub openvc_url: String,
    pub enrich: bool,
    pub enrichment_timeout_secs: u64,
    pub enrichment_delay_ms: u64,
    pub data_dir: PathBuf,
    /// Feed URLs keyed by topic category
    pub feeds: BTreeMap<String, Vec<String>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            model_program: DEFAULT_MODEL_PROGRAM.to_string(),
            model_timeout_secs: MODEL_TIMEOUT_SECS,
            chunk_size: CHUNK_SIZE,
            max_content_chars: MAX_CONTENT_CHARS,
            relevance_keywords: RELEVANCE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            clusters: DEFAULT_CLUSTERS,
            max_entries_per_feed: MAX_ENTRIES_PER_FEED,
            feed_timeout_secs: FEED_TIMEOUT_SECS,
            include_openvc: true,
            openvc_url: OPENVC_GITHUB_URL.to_string(),
            enrich: false,
            enrichment_timeout_secs: ENRICHMENT_TIMEOUT_SECS,
            enrichment_delay_ms: ENRICHMENT_DELAY_MS,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            feeds: FEEDS_BY_TOPIC
                .iter()
                .map(|(topic, urls)| {
                    (topic.to_string(), urls.iter().map(|u| u.to_string()).collect())
                })
                .collect(),
        }
    }
}

impl PipelineConfig {
    /// Parses a TOML document layered over the defaults
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Loads configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Path of the locally cached OpenVC dataset
    pub fn openvc_local_path(&self) -> PathBuf {
        self.data_dir.join(OPENVC_LOCAL_FILE)
    }

    /// Feeds for a category, falling back to the general startup feeds
    pub fn feeds_for(&self, category: &str) -> Option<(&str, &[String])> {
        self.feeds
            .get_key_value(category)
            .or_else(|| self.feeds.get_key_value(DEFAULT_FEED_CATEGORY))
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = PipelineConfig::default();

        assert_eq!(config.chunk_size, CHUNK_SIZE);
        assert_eq!(config.model, "mistral");
        assert_eq!(config.model_timeout_secs, 120);
        assert_eq!(config.relevance_keywords.len(), RELEVANCE_KEYWORDS.len());
        assert_eq!(config.feeds.len(), FEEDS_BY_TOPIC.len());
    }

    #[test]
    fn test_partial_toml_overrides_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            model = "llama3"
            clusters = 4
            relevance_keywords = ["robot"]
            "#,
        )
        .unwrap();

        assert_eq!(config.model, "llama3");
        assert_eq!(config.clusters, 4);
        assert_eq!(config.relevance_keywords, vec!["robot".to_string()]);
        // * Untouched values keep their defaults
        assert_eq!(config.chunk_size, CHUNK_SIZE);
        assert!(config.include_openvc);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = PipelineConfig::from_toml_str("clusters = \"many\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_category_falls_back() {
        let config = PipelineConfig::default();

        let (name, feeds) = config.feeds_for("Underwater Basket Weaving").unwrap();
        assert_eq!(name, DEFAULT_FEED_CATEGORY);
        assert!(!feeds.is_empty());

        let (name, _) = config.feeds_for("Fintech & SaaS").unwrap();
        assert_eq!(name, "Fintech & SaaS");
    }

    #[test]
    fn test_load_missing_file() {
        let result = PipelineConfig::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
