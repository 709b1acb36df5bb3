// * Record Schema
// * Raw source records flow into extraction; normalized startup records flow out.

use serde::{Deserialize, Serialize};

// * Defaults applied when the model omits a field
pub const DEFAULT_COUNTRY: &str = "Unknown";
pub const DEFAULT_CATEGORY: &str = "Other";
pub const UNKNOWN_PUBLISHED: &str = "Unknown";

/// One ingested text unit from a feed or dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SourceRecord {
    pub title: String,
    pub url: String,
    pub content: String,
    pub published: String,
    pub source: String,
}

impl SourceRecord {
    pub fn new(title: impl Into<String>, content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: String::new(),
            content: content.into(),
            published: UNKNOWN_PUBLISHED.to_string(),
            source: source.into(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_published(mut self, published: impl Into<String>) -> Self {
        self.published = published.into();
        self
    }
}

/// One normalized startup record
///
/// `name` is never empty for records produced by extraction.
/// `cluster` is assigned during analysis; `enriched` by the website enrichment stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StartupRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enriched: Option<bool>,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl StartupRecord {
    /// Creates a record with default country and category
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            country: default_country(),
            category: default_category(),
            url: None,
            cluster: None,
            enriched: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Key used for case-insensitive identity
    pub fn name_key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Text fed to the vectorizer
    pub fn cluster_text(&self) -> String {
        format!("{} {}", self.name, self.description)
    }
}
