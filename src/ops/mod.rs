// * Operations
// * Logging setup and Prometheus metrics shared by every pipeline stage

pub mod telemetry;

// * Re-exports for convenient access
pub use telemetry::{
    get_metrics_string, init_tracing, init_tracing_pretty, init_tracing_with_level,
    record_batch, record_clustering, record_enrichment, record_model_invocation,
    record_source_fetch, record_startups_extracted,
};
