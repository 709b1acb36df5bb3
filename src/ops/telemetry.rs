// * Telemetry - Structured Logging and Prometheus Metrics
// * Every pipeline stage logs through `tracing` and bumps the counters below

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram, register_int_counter, CounterVec, Encoder,
    Histogram, IntCounter, TextEncoder,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

lazy_static! {
    // * Extraction batches by outcome (extracted, empty, failed, aborted)
    pub static ref BATCHES_TOTAL: CounterVec = register_counter_vec!(
        "mapper_extraction_batches_total",
        "Extraction batches processed by outcome",
        &["outcome"]
    ).unwrap();

    // * Startup records accepted from model output
    pub static ref STARTUPS_EXTRACTED_TOTAL: IntCounter = register_int_counter!(
        "mapper_startups_extracted_total",
        "Startup records accepted from model output"
    ).unwrap();

    // * Wall-clock duration of one model invocation
    pub static ref MODEL_INVOCATION_SECONDS: Histogram = register_histogram!(
        "mapper_model_invocation_seconds",
        "Model invocation duration in seconds",
        vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]
    ).unwrap();

    // * Feed and dataset fetches by outcome
    pub static ref SOURCE_FETCH_TOTAL: CounterVec = register_counter_vec!(
        "mapper_source_fetch_total",
        "Feed and dataset fetches by source kind and outcome",
        &["kind", "outcome"]
    ).unwrap();

    // * Website enrichment attempts by outcome
    pub static ref ENRICHMENT_TOTAL: CounterVec = register_counter_vec!(
        "mapper_enrichment_total",
        "Website enrichment attempts by outcome",
        &["outcome"]
    ).unwrap();

    // * Clustering runs by mode (kmeans, single, degraded)
    pub static ref CLUSTERING_RUNS_TOTAL: CounterVec = register_counter_vec!(
        "mapper_clustering_runs_total",
        "Clustering runs by mode",
        &["mode"]
    ).unwrap();
}

/// Initializes the tracing subscriber with JSON formatting
///
/// # Example
/// ```ignore
/// use market_mapper::ops::telemetry;
///
/// telemetry::init_tracing();
/// tracing::info!(topic = "AI", "Starting pipeline");
/// ```
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Initializes JSON tracing with a custom default level
pub fn init_tracing_with_level(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();
}

/// Initializes tracing with pretty formatting (for development)
pub fn init_tracing_pretty() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().pretty().with_writer(std::io::stderr))
        .init();
}

/// Returns the current metrics in Prometheus text format
pub fn get_metrics_string() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Records the outcome of one extraction batch
pub fn record_batch(outcome: &str) {
    BATCHES_TOTAL.with_label_values(&[outcome]).inc();
}

/// Records startups accepted during an extraction run
pub fn record_startups_extracted(count: usize) {
    STARTUPS_EXTRACTED_TOTAL.inc_by(count as u64);
}

/// Records the duration of a model invocation
pub fn record_model_invocation(seconds: f64) {
    MODEL_INVOCATION_SECONDS.observe(seconds);
}

/// Records a feed or dataset fetch
pub fn record_source_fetch(kind: &str, outcome: &str) {
    SOURCE_FETCH_TOTAL.with_label_values(&[kind, outcome]).inc();
}

/// Records a website enrichment attempt
pub fn record_enrichment(outcome: &str) {
    ENRICHMENT_TOTAL.with_label_values(&[outcome]).inc();
}

/// Records how a clustering run assigned labels
pub fn record_clustering(mode: &str) {
    CLUSTERING_RUNS_TOTAL.with_label_values(&[mode]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_batch_outcomes() {
        let before = BATCHES_TOTAL.with_label_values(&["failed"]).get();
        record_batch("failed");
        assert!(BATCHES_TOTAL.with_label_values(&["failed"]).get() >= before + 1.0);
    }

    #[test]
    fn test_record_startups_extracted() {
        let before = STARTUPS_EXTRACTED_TOTAL.get();
        record_startups_extracted(3);
        assert!(STARTUPS_EXTRACTED_TOTAL.get() >= before + 3);
    }

    #[test]
    fn test_record_durations_and_outcomes() {
        record_model_invocation(1.5);
        record_source_fetch("rss", "ok");
        record_enrichment("enriched");
        record_clustering("single");
        // * Histograms and counters should be updated
        assert!(MODEL_INVOCATION_SECONDS.get_sample_count() >= 1);
    }

    #[test]
    fn test_get_metrics_string() {
        record_clustering("kmeans");
        let metrics = get_metrics_string();
        assert!(metrics.contains("mapper_clustering_runs_total"));
    }
}
