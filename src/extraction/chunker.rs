// * Batch Chunker & Prompt Builder
// * Groups source records into fixed-size batches and renders one extraction
// * prompt per batch.

use crate::config::constants::{CHUNK_SIZE, MAX_CONTENT_CHARS, MAX_TITLE_CHARS};
use crate::schema::SourceRecord;

// * Separator placed between articles inside a prompt
pub const ARTICLE_SEPARATOR: &str = "\n\n---\n\n";

/// A contiguous group of source records processed by one model call
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<'a> {
    /// 1-based position of the batch
    pub number: usize,
    pub records: &'a [SourceRecord],
}

impl Batch<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Configuration for batching and prompt rendering
#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    /// Records per batch (0 is treated as 1)
    pub chunk_size: usize,
    /// Characters of content kept per record
    pub max_content_chars: usize,
    /// Characters of title kept per record
    pub max_title_chars: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            max_content_chars: MAX_CONTENT_CHARS,
            max_title_chars: MAX_TITLE_CHARS,
        }
    }
}

/// Splits records into batches and builds prompts
#[derive(Debug, Clone, Default)]
pub struct BatchChunker {
    config: ChunkerConfig,
}

impl BatchChunker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ChunkerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    fn effective_size(&self) -> usize {
        self.config.chunk_size.max(1)
    }

    /// Partitions records into contiguous batches; the last may be shorter
    pub fn batches<'a>(&self, records: &'a [SourceRecord]) -> Vec<Batch<'a>> {
        records
            .chunks(self.effective_size())
            .enumerate()
            .map(|(idx, records)| Batch {
                number: idx + 1,
                records,
            })
            .collect()
    }

    /// Number of batches `len` records produce
    pub fn batch_count(&self, len: usize) -> usize {
        len.div_ceil(self.effective_size())
    }

    /// Renders the article block of a batch
    pub fn render_articles(&self, records: &[SourceRecord]) -> String {
        records
            .iter()
            .filter_map(|record| {
                let content = truncate_chars(&record.content, self.config.max_content_chars);
                let content = content.trim();
                if content.is_empty() {
                    return None;
                }

                let title = if record.title.trim().is_empty() {
                    "Unknown"
                } else {
                    truncate_chars(&record.title, self.config.max_title_chars)
                };

                Some(format!("Article: {}\n{}", title, content))
            })
            .collect::<Vec<_>>()
            .join(ARTICLE_SEPARATOR)
    }

    /// Builds the extraction prompt for one batch
    pub fn build_prompt(&self, records: &[SourceRecord], topic: &str) -> String {
        let text_block = self.render_articles(records);

        format!(
            r#"You are a startup analyst.
From the following startup news summaries, extract companies related to "{topic}".
Return only JSON array:
[{{"name":"", "description":"", "country":"", "category":""}}]

If no startups are found, return an empty list: []

Texts:
{text_block}

JSON:"#
        )
    }
}

/// Truncates to at most `max` characters on a char boundary
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<SourceRecord> {
        (0..n)
            .map(|i| SourceRecord::new(format!("Title {}", i), format!("Content {}", i), "test"))
            .collect()
    }

    #[test]
    fn test_batches_preserve_order_and_size() {
        let chunker = BatchChunker::new();
        let input = records(12);

        let batches = chunker.batches(&input);

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 5);
        assert_eq!(batches[1].len(), 5);
        assert_eq!(batches[2].len(), 2);
        assert_eq!(batches[2].number, 3);
        assert_eq!(batches[1].records[0].title, "Title 5");
        assert_eq!(chunker.batch_count(12), 3);
    }

    #[test]
    fn test_empty_input_has_no_batches() {
        let chunker = BatchChunker::new();
        assert!(chunker.batches(&[]).is_empty());
        assert_eq!(chunker.batch_count(0), 0);
    }

    #[test]
    fn test_zero_chunk_size_treated_as_one() {
        let chunker = BatchChunker::with_config(ChunkerConfig {
            chunk_size: 0,
            ..Default::default()
        });
        assert_eq!(chunker.batches(&records(3)).len(), 3);
    }

    #[test]
    fn test_prompt_contains_instructions_and_topic() {
        let chunker = BatchChunker::new();
        let prompt = chunker.build_prompt(&records(2), "Climate");

        assert!(prompt.contains(r#"related to "Climate""#));
        assert!(prompt.contains(r#"[{"name":"", "description":"", "country":"", "category":""}]"#));
        assert!(prompt.contains("return an empty list: []"));
        assert!(prompt.contains("Article: Title 0\nContent 0"));
        assert!(prompt.contains(ARTICLE_SEPARATOR));
        assert!(prompt.trim_end().ends_with("JSON:"));
    }

    #[test]
    fn test_content_truncated_to_limit() {
        let chunker = BatchChunker::new();
        let long = SourceRecord::new("Long", "é".repeat(2000), "test");

        let block = chunker.render_articles(&[long]);
        let body = block.strip_prefix("Article: Long\n").unwrap();

        assert_eq!(body.chars().count(), MAX_CONTENT_CHARS);
    }

    #[test]
    fn test_blank_content_skipped_and_blank_title_named() {
        let chunker = BatchChunker::new();
        let input = vec![
            SourceRecord::new("Empty", "   ", "test"),
            SourceRecord::new("", "Body text", "test"),
        ];

        let block = chunker.render_articles(&input);

        assert_eq!(block, "Article: Unknown\nBody text");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hi", 10), "hi");
        assert_eq!(truncate_chars("日本語", 2), "日本");
    }
}
