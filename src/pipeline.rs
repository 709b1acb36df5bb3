// * Pipeline
// * extraction -> (enrichment) -> dedup + clustering -> insights -> JSON results.
// * Stages run strictly one after another.

use crate::analysis::{self, insights, ClusterMode, Clusterer, Distribution, SummaryStats};
use crate::enrichment::WebsiteEnricher;
use crate::extraction::{ExtractionOrchestrator, ModelError, ModelInvoker};
use crate::persistence::{self, PersistenceError};
use crate::progress::ProgressSink;
use crate::schema::{SourceRecord, StartupRecord};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No source data available")]
    NoSourceData,

    #[error("Extraction aborted: {0}")]
    Extraction(#[from] ModelError),

    #[error("Failed to persist results: {0}")]
    Persistence(#[from] PersistenceError),
}

/// One progress sink per stage
#[derive(Clone, Copy)]
pub struct StageSinks<'a> {
    pub extraction: &'a dyn ProgressSink,
    pub enrichment: &'a dyn ProgressSink,
    pub analysis: &'a dyn ProgressSink,
}

impl<'a> StageSinks<'a> {
    /// Every stage reports into the same sink
    pub fn shared(sink: &'a dyn ProgressSink) -> Self {
        Self {
            extraction: sink,
            enrichment: sink,
            analysis: sink,
        }
    }
}

/// Everything the presentation layer needs from one run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub startups: Vec<StartupRecord>,
    pub insights: String,
    pub stats: SummaryStats,
    pub categories: Vec<Distribution>,
    pub countries: Vec<Distribution>,
    pub duplicates_removed: usize,
    #[serde(skip)]
    pub cluster_mode: ClusterMode,
    pub output_path: Option<PathBuf>,
}

impl PipelineReport {
    /// Builds the report for already extracted startups
    pub fn from_analysis(analysis: analysis::Analysis) -> Self {
        let records = analysis.records;
        Self {
            insights: insights::generate_summary(&records),
            stats: insights::summary_stats(&records),
            categories: insights::category_distribution(&records),
            countries: insights::country_distribution(&records),
            duplicates_removed: analysis.duplicates_removed,
            cluster_mode: analysis.mode,
            startups: records,
            output_path: None,
        }
    }
}

pub struct Pipeline<M: ModelInvoker> {
    extractor: ExtractionOrchestrator<M>,
    clusterer: Clusterer,
    enricher: Option<WebsiteEnricher>,
    output_dir: Option<PathBuf>,
}

impl<M: ModelInvoker> Pipeline<M> {
    pub fn new(extractor: ExtractionOrchestrator<M>, clusterer: Clusterer) -> Self {
        Self {
            extractor,
            clusterer,
            enricher: None,
            output_dir: None,
        }
    }

    pub fn with_enricher(mut self, enricher: WebsiteEnricher) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// Results are written here when set
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Runs every stage over `records`
    ///
    /// Fails only when there is no input at all, the model runtime is
    /// unreachable, or results cannot be written.
    pub async fn run(
        &self,
        records: &[SourceRecord],
        topic: &str,
        sinks: StageSinks<'_>,
    ) -> Result<PipelineReport, PipelineError> {
        if records.is_empty() {
            tracing::error!("No source data available");
            return Err(PipelineError::NoSourceData);
        }

        tracing::info!(records = records.len(), topic, "Pipeline started");

        let mut startups = self.extractor.extract(records, topic, sinks.extraction).await?;
        if startups.is_empty() {
            tracing::warn!(topic, "No startups extracted");
            sinks
                .extraction
                .report("No startups extracted. The data may not contain relevant startup information.");
        } else {
            sinks.extraction.report(&format!(
                "Identified {} startups via model '{}'",
                startups.len(),
                self.extractor.invoker().model()
            ));
        }

        match &self.enricher {
            Some(_) if startups.is_empty() => sinks.enrichment.report("Skipped (no startups)"),
            Some(enricher) => {
                enricher.enrich_startups(&mut startups, sinks.enrichment).await;
            }
            None => sinks.enrichment.report("Skipped (disabled)"),
        }

        let analysis = analysis::analyze(startups, &self.clusterer, sinks.analysis);
        let mut report = PipelineReport::from_analysis(analysis);
        sinks
            .analysis
            .report(&format!("Clustered into {} categories", report.stats.clusters));

        if let Some(dir) = &self.output_dir {
            if !report.startups.is_empty() {
                let path = persistence::save_results(&report.startups, topic, dir)?;
                report.output_path = Some(path);
            }
        }

        tracing::info!(
            startups = report.startups.len(),
            clusters = report.stats.clusters,
            "Pipeline finished"
        );

        Ok(report)
    }
}
