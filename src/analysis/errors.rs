use thiserror::Error;

// * Reasons clustering fell back to a single cluster.
// * Never surfaced to callers as a failure; the analysis stage degrades instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusteringError {
    #[error("Vocabulary is empty after stop word removal")]
    EmptyVocabulary,

    #[error("Only {distinct} distinct vectors for {clusters} clusters")]
    TooFewDistinctVectors { distinct: usize, clusters: usize },

    #[error("K-means failed: {0}")]
    Solver(String),
}
