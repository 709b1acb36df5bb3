// * Analysis Stage
// * Deduplicates extracted startups, clusters them and derives insights.

pub mod clustering;
pub mod dedup;
pub mod errors;
pub mod insights;
pub mod vectorizer;

// * Re-exports for convenient access
pub use clustering::{ClusterMode, Clusterer};
pub use dedup::{dedup_by_name, DedupResult};
pub use errors::ClusteringError;
pub use insights::{generate_summary, summary_stats, Distribution, SummaryStats};
pub use vectorizer::{TfidfConfig, TfidfMatrix, TfidfVectorizer};

use crate::progress::ProgressSink;
use crate::schema::StartupRecord;

/// Result of one analysis run
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Unique startups, each carrying a cluster label
    pub records: Vec<StartupRecord>,
    pub duplicates_removed: usize,
    pub mode: ClusterMode,
}

/// Deduplicates then clusters
pub fn analyze(records: Vec<StartupRecord>, clusterer: &Clusterer, progress: &dyn ProgressSink) -> Analysis {
    if records.is_empty() {
        progress.report("No startups to analyze");
        return Analysis {
            records,
            duplicates_removed: 0,
            mode: ClusterMode::Single,
        };
    }

    progress.report(&format!("Analyzing {} startups...", records.len()));

    let DedupResult { mut records, removed } = dedup_by_name(records);
    progress.report(&format!("After deduplication: {} unique startups", records.len()));

    let mode = clusterer.assign(&mut records, progress);
    progress.report("Analysis complete");

    Analysis {
        records,
        duplicates_removed: removed,
        mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::CollectingSink;

    #[test]
    fn test_analyze_dedups_before_clustering() {
        let input = vec![
            StartupRecord::new("Acme", "AI platform"),
            StartupRecord::new("ACME", "duplicate"),
        ];
        let sink = CollectingSink::new();

        let analysis = analyze(input, &Clusterer::new(6), &sink);

        assert_eq!(analysis.records.len(), 1);
        assert_eq!(analysis.duplicates_removed, 1);
        assert_eq!(analysis.records[0].cluster, Some(0));
        assert!(sink.contains("After deduplication: 1 unique startups"));
    }

    #[test]
    fn test_analyze_empty() {
        let sink = CollectingSink::new();
        let analysis = analyze(Vec::new(), &Clusterer::default(), &sink);
        assert!(analysis.records.is_empty());
        assert!(sink.contains("No startups to analyze"));
    }
}
