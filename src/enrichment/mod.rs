// * Website Enrichment
// * Replaces thin startup descriptions with copy scraped from the company site.
// * Requests go out one at a time, paced by a governor limiter.

pub mod description;

pub use description::{extract_description, visible_text};

use crate::config::constants::{
    ENRICHMENT_DELAY_MS, ENRICHMENT_SKIP_DESCRIPTION_CHARS, ENRICHMENT_TIMEOUT_SECS,
};
use crate::extraction::truncate_chars;
use crate::ops::telemetry;
use crate::progress::ProgressSink;
use crate::schema::StartupRecord;
use governor::{Quota, RateLimiter as GovernorLimiter};
use nonzero_ext::nonzero;
use std::time::Duration;
use thiserror::Error;
use url::Url;

// * Sub-pages tried after the home page
const ABOUT_PATHS: &[&str] = &["/about", "/about-us", "/company"];

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Candidate pages for a company site, home page first
pub fn candidate_urls(url: &str) -> Vec<String> {
    let base = url.trim_end_matches('/');
    std::iter::once(url.to_string())
        .chain(ABOUT_PATHS.iter().map(|path| format!("{}{}", base, path)))
        .collect()
}

/// Whether a record is worth a scrape: an http(s) site and a thin description
pub fn needs_enrichment(record: &StartupRecord) -> bool {
    let has_site = record
        .url
        .as_deref()
        .and_then(|u| Url::parse(u.trim()).ok())
        .is_some_and(|u| matches!(u.scheme(), "http" | "https"));
    has_site && record.description.chars().count() <= ENRICHMENT_SKIP_DESCRIPTION_CHARS
}

pub struct WebsiteEnricher {
    client: reqwest::Client,
    limiter: GovernorLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl WebsiteEnricher {
    pub fn new(timeout: Duration, delay: Duration) -> Result<Self, EnrichmentError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()?;

        // * One request per `delay`; a zero delay still caps at one per millisecond
        let quota = Quota::with_period(delay.max(Duration::from_millis(1)))
            .unwrap_or_else(|| Quota::per_second(nonzero!(2u32)));

        Ok(Self {
            client,
            limiter: GovernorLimiter::direct(quota),
        })
    }

    pub fn with_defaults() -> Result<Self, EnrichmentError> {
        Self::new(
            Duration::from_secs(ENRICHMENT_TIMEOUT_SECS),
            Duration::from_millis(ENRICHMENT_DELAY_MS),
        )
    }

    /// Tries the site and its about pages; first usable description wins
    pub async fn scrape_description(&self, url: &str) -> Option<String> {
        for candidate in candidate_urls(url) {
            self.limiter.until_ready().await;

            let resp = match self.client.get(&candidate).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::debug!(url = %candidate, error = %e, "Enrichment request failed");
                    continue;
                }
            };

            if resp.status().as_u16() != 200 {
                continue;
            }

            let Ok(body) = resp.text().await else {
                continue;
            };

            if let Some(description) = extract_description(&body) {
                return Some(description);
            }
        }

        None
    }

    /// Enriches every record that has a site and a short description
    ///
    /// Returns how many records were enriched.
    pub async fn enrich_startups(&self, records: &mut [StartupRecord], progress: &dyn ProgressSink) -> usize {
        progress.report("Starting website enrichment...");
        let total = records.len();

        for (idx, record) in records.iter_mut().enumerate() {
            if !needs_enrichment(record) {
                continue;
            }

            let name = truncate_chars(&record.name, 40).to_string();
            progress.report(&format!("Enriching {}/{}: {}...", idx + 1, total, name));

            let url = record.url.clone().unwrap_or_default();
            match self.scrape_description(&url).await {
                Some(description) => {
                    record.description = description;
                    record.enriched = Some(true);
                    telemetry::record_enrichment("enriched");
                    progress.report(&format!("Enriched {}", name));
                }
                None => {
                    record.enriched = Some(false);
                    telemetry::record_enrichment("failed");
                    progress.report(&format!("Could not enrich {}", name));
                }
            }
        }

        let enriched = records.iter().filter(|r| r.enriched == Some(true)).count();
        progress.report(&format!("Enrichment complete: {}/{} startups enriched", enriched, total));
        tracing::info!(enriched, total, "Website enrichment complete");

        enriched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::CollectingSink;

    #[test]
    fn test_candidate_urls() {
        assert_eq!(
            candidate_urls("https://acme.io/"),
            vec![
                "https://acme.io/",
                "https://acme.io/about",
                "https://acme.io/about-us",
                "https://acme.io/company",
            ]
        );
    }

    #[test]
    fn test_needs_enrichment() {
        let bare = StartupRecord::new("Acme", "AI");
        assert!(!needs_enrichment(&bare));

        let with_site = StartupRecord::new("Acme", "AI").with_url("https://acme.io");
        assert!(needs_enrichment(&with_site));

        let described = StartupRecord::new("Acme", "d".repeat(150)).with_url("https://acme.io");
        assert!(!needs_enrichment(&described));

        let not_a_site = StartupRecord::new("Acme", "AI").with_url("acme dot io");
        assert!(!needs_enrichment(&not_a_site));
    }

    #[tokio::test]
    async fn test_records_without_sites_are_untouched() {
        let enricher = WebsiteEnricher::with_defaults().unwrap();
        let mut records = vec![StartupRecord::new("Acme", "AI platform")];
        let sink = CollectingSink::new();

        let enriched = enricher.enrich_startups(&mut records, &sink).await;

        assert_eq!(enriched, 0);
        assert!(records[0].enriched.is_none());
        assert!(sink.contains("Enrichment complete: 0/1 startups enriched"));
    }

    #[tokio::test]
    async fn test_unreachable_site_marks_not_enriched() {
        let enricher =
            WebsiteEnricher::new(Duration::from_millis(500), Duration::from_millis(1)).unwrap();
        let mut records = vec![StartupRecord::new("Acme", "AI").with_url("http://127.0.0.1:9")];

        enricher.enrich_startups(&mut records, &CollectingSink::new()).await;

        assert_eq!(records[0].enriched, Some(false));
        assert_eq!(records[0].description, "AI");
    }
}
