// * RSS / Atom Feed Fetcher
// * reqwest for transport, feed-rs for parsing. Entries become source records.

use crate::config::constants::{FEED_TIMEOUT_SECS, MAX_ENTRIES_PER_FEED, MIN_SOURCE_CONTENT_CHARS};
use crate::research::errors::ResearchError;
use crate::schema::{SourceRecord, UNKNOWN_PUBLISHED};
use feed_rs::model::Entry;
use std::time::Duration;

pub const NO_TITLE: &str = "No title";

// * Identifies our traffic to feed hosts
pub const USER_AGENT: &str = concat!("market-mapper/", env!("CARGO_PKG_VERSION"));

pub struct FeedFetcher {
    client: reqwest::Client,
    max_entries: usize,
}

impl FeedFetcher {
    pub fn new(timeout: Duration, max_entries: usize) -> Result<Self, ResearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, max_entries })
    }

    pub fn with_defaults() -> Result<Self, ResearchError> {
        Self::new(Duration::from_secs(FEED_TIMEOUT_SECS), MAX_ENTRIES_PER_FEED)
    }

    /// Fetches one feed and maps its leading entries
    pub async fn fetch(&self, feed_url: &str) -> Result<Vec<SourceRecord>, ResearchError> {
        let resp = self.client.get(feed_url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ResearchError::Status(status.as_u16()));
        }

        let bytes = resp.bytes().await?;
        parse_feed(&bytes, feed_url, self.max_entries)
    }
}

/// Parses feed bytes into source records, keeping entries with enough content
pub fn parse_feed(bytes: &[u8], feed_url: &str, max_entries: usize) -> Result<Vec<SourceRecord>, ResearchError> {
    let feed = feed_rs::parser::parse(bytes)?;

    Ok(feed
        .entries
        .into_iter()
        .take(max_entries)
        .map(|entry| entry_to_record(entry, feed_url))
        .filter(|record| record.content.chars().count() > MIN_SOURCE_CONTENT_CHARS)
        .collect())
}

fn entry_to_record(entry: Entry, feed_url: &str) -> SourceRecord {
    let title = entry
        .title
        .map(|t| t.content)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let url = entry.links.first().map(|l| l.href.clone()).unwrap_or_default();

    // * Summary first, then the full content body
    let content = entry
        .summary
        .map(|s| s.content)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| entry.content.and_then(|c| c.body))
        .unwrap_or_default();

    let published = entry
        .published
        .or(entry.updated)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| UNKNOWN_PUBLISHED.to_string());

    SourceRecord {
        title,
        url,
        content,
        published,
        source: feed_url.to_string(),
    }
}
