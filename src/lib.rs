// * Market Mapper
// * Discovers startups in news feeds and datasets, extracts structured records
// * with a local language model, then clusters and summarizes them.

pub mod analysis;
pub mod config;
pub mod enrichment;
pub mod extraction;
pub mod ops;
pub mod persistence;
pub mod pipeline;
pub mod progress;
pub mod research;
pub mod schema;

pub use pipeline::{Pipeline, PipelineError, PipelineReport, StageSinks};
pub use progress::ProgressSink;
pub use schema::{SourceRecord, StartupRecord};
