use thiserror::Error;

// * Failures of a single feed or dataset fetch. Reported and skipped by the collector.
#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0} from source")]
    Status(u16),

    #[error("Feed parse error: {0}")]
    Feed(#[from] feed_rs::parser::ParseFeedError),

    #[error("Dataset parse error: {0}")]
    Dataset(#[from] serde_json::Error),

    #[error("Dataset read error: {0}")]
    Io(#[from] std::io::Error),
}
