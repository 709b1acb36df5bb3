// * Extraction Orchestrator
// * Pre-filters source records, then walks the batches one at a time:
// * prompt -> model -> lenient parse -> normalized startup records.

use crate::config::constants::RELEVANCE_KEYWORDS;
use crate::extraction::chunker::{BatchChunker, ChunkerConfig};
use crate::extraction::errors::ModelError;
use crate::extraction::invoker::ModelInvoker;
use crate::extraction::parser::ResponseParser;
use crate::ops::telemetry;
use crate::progress::ProgressSink;
use crate::schema::{SourceRecord, StartupRecord, DEFAULT_CATEGORY, DEFAULT_COUNTRY};
use serde_json::{Map, Value};

/// Outcome of a single batch
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// Records accepted from the batch (possibly none)
    Extracted(usize),
    /// The model answered without any recoverable JSON array
    NoStructuredData,
    /// The batch was skipped after a recoverable model error
    Failed(ModelError),
}

/// Drives chunking, invocation and parsing over all source records
pub struct ExtractionOrchestrator<M: ModelInvoker> {
    invoker: M,
    chunker: BatchChunker,
    parser: ResponseParser,
    keywords: Vec<String>,
}

impl<M: ModelInvoker> ExtractionOrchestrator<M> {
    /// Default chunking and keyword list
    pub fn new(invoker: M) -> Self {
        Self {
            invoker,
            chunker: BatchChunker::new(),
            parser: ResponseParser::new(),
            keywords: RELEVANCE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn with_chunker(mut self, config: ChunkerConfig) -> Self {
        self.chunker = BatchChunker::with_config(config);
        self
    }

    pub fn with_parser(mut self, parser: ResponseParser) -> Self {
        self.parser = parser;
        self
    }

    /// Replaces the relevance keywords (matched lower-cased)
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords.into_iter().map(|k| k.to_lowercase()).collect();
        self
    }

    pub fn invoker(&self) -> &M {
        &self.invoker
    }

    /// Whether a record mentions any relevance keyword in its title or content
    pub fn is_relevant(&self, record: &SourceRecord) -> bool {
        let content = record.content.to_lowercase();
        let title = record.title.to_lowercase();
        self.keywords
            .iter()
            .any(|kw| content.contains(kw.as_str()) || title.contains(kw.as_str()))
    }

    /// Keeps only keyword-relevant records, preserving order
    pub fn prefilter<'a>(&self, records: &'a [SourceRecord]) -> Vec<&'a SourceRecord> {
        records.iter().filter(|r| self.is_relevant(r)).collect()
    }

    /// Extracts startup records from all source records
    ///
    /// Batch timeouts and process failures are reported and skipped. Only an
    /// unreachable model runtime aborts the run.
    pub async fn extract(
        &self,
        records: &[SourceRecord],
        topic: &str,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<StartupRecord>, ModelError> {
        progress.report(&format!("Starting batch extraction with model '{}'...", self.invoker.model()));

        let relevant: Vec<SourceRecord> = self.prefilter(records).into_iter().cloned().collect();
        progress.report(&format!(
            "Pre-filter: {}/{} relevant articles kept after filtering.",
            relevant.len(),
            records.len()
        ));
        tracing::info!(kept = relevant.len(), total = records.len(), "Relevance pre-filter applied");

        if relevant.is_empty() {
            progress.report("No relevant articles found. Skipping extraction.");
            return Ok(Vec::new());
        }

        let batches = self.chunker.batches(&relevant);
        let total_batches = batches.len();
        progress.report(&format!(
            "Processing {} articles per batch...",
            self.chunker.config().chunk_size.max(1)
        ));

        let mut startups = Vec::new();

        for batch in batches {
            progress.report(&format!(
                "Processing batch {}/{} ({} articles)...",
                batch.number,
                total_batches,
                batch.len()
            ));

            let prompt = self.chunker.build_prompt(batch.records, topic);
            let outcome = match self.invoker.generate(&prompt).await {
                Ok(response) => match self.parser.parse(&response) {
                    Some(items) => {
                        let accepted: Vec<StartupRecord> =
                            items.iter().filter_map(normalize_startup).collect();
                        let count = accepted.len();
                        startups.extend(accepted);
                        BatchOutcome::Extracted(count)
                    }
                    None => BatchOutcome::NoStructuredData,
                },
                Err(e) if e.is_fatal() => {
                    telemetry::record_batch("aborted");
                    progress.report(&format!("Extraction aborted: {}", e));
                    tracing::error!(batch = batch.number, error = %e, "Model runtime unavailable");
                    return Err(e);
                }
                Err(e) => BatchOutcome::Failed(e),
            };

            self.report_batch(batch.number, &outcome, progress);
        }

        telemetry::record_startups_extracted(startups.len());
        progress.report(&format!(
            "Extraction complete: {} total startups extracted from {} articles",
            startups.len(),
            relevant.len()
        ));

        Ok(startups)
    }

    fn report_batch(&self, number: usize, outcome: &BatchOutcome, progress: &dyn ProgressSink) {
        match outcome {
            BatchOutcome::Extracted(count) if *count > 0 => {
                telemetry::record_batch("extracted");
                progress.report(&format!("Batch {}: Found {} startups", number, count));
            }
            BatchOutcome::Extracted(_) | BatchOutcome::NoStructuredData => {
                telemetry::record_batch("empty");
                progress.report(&format!("Batch {}: No startups found", number));
            }
            BatchOutcome::Failed(e) => {
                telemetry::record_batch("failed");
                tracing::warn!(batch = number, error = %e, "Batch extraction failed");
                progress.report(&format!("Extraction error for batch {}: {}", number, e));
            }
        }
    }
}

/// Builds a startup record from one parsed object
///
/// Returns `None` for non-objects and for objects without a usable name.
pub fn normalize_startup(item: &Value) -> Option<StartupRecord> {
    let object = item.as_object()?;

    let name = field_text(object, "name")?;
    if name.is_empty() {
        return None;
    }

    let description = field_text(object, "description").unwrap_or_default();
    let country = non_blank(field_text(object, "country")).unwrap_or_else(|| DEFAULT_COUNTRY.to_string());
    let category =
        non_blank(field_text(object, "category")).unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let url = non_blank(field_text(object, "url").or_else(|| field_text(object, "website")));

    let mut record = StartupRecord::new(name, description)
        .with_country(country)
        .with_category(category);
    record.url = url;

    Some(record)
}

// * Strings pass through, other scalars use their JSON text, null counts as missing
fn field_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string().trim().to_string()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
