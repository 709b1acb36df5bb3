// * Research Stage
// * Collects source records from the RSS feeds of a topic category and,
// * optionally, the OpenVC startup dataset.

pub mod errors;
pub mod feeds;
pub mod openvc;

// * Re-exports for convenient access
pub use errors::ResearchError;
pub use feeds::{parse_feed, FeedFetcher};
pub use openvc::{dataset_records, load_openvc, DatasetOrigin};

use crate::config::constants::RSS_ARTICLES_FILE;
use crate::config::PipelineConfig;
use crate::extraction::truncate_chars;
use crate::ops::telemetry;
use crate::persistence;
use crate::progress::ProgressSink;
use crate::schema::SourceRecord;
use std::time::Duration;

/// Fetches every source of a category, one after another
pub struct ResearchCollector {
    config: PipelineConfig,
    fetcher: FeedFetcher,
    client: reqwest::Client,
}

impl ResearchCollector {
    pub fn new(config: PipelineConfig) -> Result<Self, ResearchError> {
        let timeout = Duration::from_secs(config.feed_timeout_secs);
        let fetcher = FeedFetcher::new(timeout, config.max_entries_per_feed)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(feeds::USER_AGENT)
            .build()?;

        Ok(Self { config, fetcher, client })
    }

    /// Configured category names, sorted
    pub fn categories(&self) -> Vec<&str> {
        self.config.feeds.keys().map(String::as_str).collect()
    }

    /// Collects records from the category's feeds and the dataset
    ///
    /// Failing sources are reported and skipped. The combined records are saved
    /// to the data directory (best effort).
    pub async fn fetch_all_sources(
        &self,
        category: &str,
        include_openvc: bool,
        progress: &dyn ProgressSink,
    ) -> Vec<SourceRecord> {
        progress.report(&format!("Starting multi-source data collection for '{}'...", category));

        let mut records = Vec::new();
        match self.config.feeds_for(category) {
            Some((resolved, feeds)) => {
                if resolved != category {
                    progress.report(&format!("Unknown category '{}', using '{}'", category, resolved));
                }
                progress.report(&format!("Loading {} feeds for '{}'...", feeds.len(), resolved));

                for feed_url in feeds {
                    records.extend(self.fetch_feed(feed_url, progress).await);
                }
            }
            None => progress.report("No feeds configured"),
        }

        let rss_count = records.len();
        progress.report(&format!("Collected {} articles from RSS feeds", rss_count));

        let mut openvc_count = 0;
        if include_openvc {
            let startups = self.load_dataset(progress).await;
            openvc_count = startups.len();
            records.extend(startups);
            progress.report(&format!("Added {} entries from OpenVC dataset", openvc_count));
        }

        let path = self.config.data_dir.join(RSS_ARTICLES_FILE);
        match persistence::save_source_records(&path, &records) {
            Ok(()) => progress.report(&format!("Saved {} articles to {}", records.len(), path.display())),
            Err(e) => progress.report(&format!("Error saving articles: {}", e)),
        }

        progress.report(&format!(
            "Research complete: {} data points collected ({} RSS + {} OpenVC)",
            records.len(),
            rss_count,
            openvc_count
        ));
        tracing::info!(total = records.len(), rss = rss_count, openvc = openvc_count, "Research complete");

        records
    }

    async fn fetch_feed(&self, feed_url: &str, progress: &dyn ProgressSink) -> Vec<SourceRecord> {
        progress.report(&format!("Fetching RSS feed: {}...", truncate_chars(feed_url, 60)));

        match self.fetcher.fetch(feed_url).await {
            Ok(articles) => {
                telemetry::record_source_fetch("rss", "ok");
                progress.report(&format!("Fetched {} articles from RSS feed", articles.len()));
                articles
            }
            Err(e) => {
                telemetry::record_source_fetch("rss", "error");
                tracing::warn!(feed = feed_url, error = %e, "Feed fetch failed");
                progress.report(&format!("Error fetching RSS feed: {}", e));
                Vec::new()
            }
        }
    }

    async fn load_dataset(&self, progress: &dyn ProgressSink) -> Vec<SourceRecord> {
        progress.report("Loading OpenVC dataset...");

        let local = self.config.openvc_local_path();
        match load_openvc(&local, &self.config.openvc_url, &self.client).await {
            Ok((origin, records)) => {
                telemetry::record_source_fetch("openvc", "ok");
                let from = match origin {
                    DatasetOrigin::Local => "local OpenVC dataset",
                    DatasetOrigin::Remote => "remote OpenVC dataset",
                };
                progress.report(&format!("Loaded {} startups from {}", records.len(), from));
                records
            }
            Err(e) => {
                telemetry::record_source_fetch("openvc", "error");
                tracing::warn!(error = %e, "OpenVC dataset unavailable");
                progress.report(&format!("Error loading OpenVC dataset: {}", e));
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::CollectingSink;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_collect_from_local_dataset_only() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            data_dir: dir.path().to_path_buf(),
            feeds: BTreeMap::new(),
            ..Default::default()
        };
        std::fs::write(
            config.openvc_local_path(),
            r#"[{"name":"Gridly","description":"Grid software startup balancing renewable energy for European utilities."}]"#,
        )
        .unwrap();

        let collector = ResearchCollector::new(config).unwrap();
        let sink = CollectingSink::new();

        let records = collector.fetch_all_sources("General Startups", true, &sink).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Gridly");
        assert!(sink.contains("No feeds configured"));
        assert!(sink.contains("Research complete: 1 data points collected (0 RSS + 1 OpenVC)"));
        assert!(dir.path().join(RSS_ARTICLES_FILE).exists());
    }
}
