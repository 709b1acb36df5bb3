// * Startup Clusterer
// * TF-IDF over name + description, then k-means with a fixed seed.
// * Too little data, a single distinct vector, or any vectorizer/solver failure puts
// * everything in cluster 0.

use crate::analysis::errors::ClusteringError;
use crate::analysis::vectorizer::{TfidfConfig, TfidfMatrix, TfidfVectorizer};
use crate::config::constants::{DEFAULT_CLUSTERS, KMEANS_RUNS, KMEANS_SEED};
use crate::ops::telemetry;
use crate::progress::ProgressSink;
use crate::schema::StartupRecord;
use linfa::prelude::*;
use linfa_clustering::KMeans;
use ndarray::Array1;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use std::collections::HashSet;

/// How labels were assigned in one run
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterMode {
    /// k-means produced this many clusters
    KMeans(usize),
    /// Not enough records to support more than one cluster
    Single,
    /// Vectorization or partitioning failed
    Degraded(ClusteringError),
}

impl ClusterMode {
    pub fn label(&self) -> &'static str {
        match self {
            ClusterMode::KMeans(_) => "kmeans",
            ClusterMode::Single => "single",
            ClusterMode::Degraded(_) => "degraded",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Clusterer {
    target_clusters: usize,
    vectorizer: TfidfVectorizer,
    seed: u64,
    n_runs: usize,
}

impl Default for Clusterer {
    fn default() -> Self {
        Self::new(DEFAULT_CLUSTERS)
    }
}

impl Clusterer {
    pub fn new(target_clusters: usize) -> Self {
        Self {
            target_clusters,
            vectorizer: TfidfVectorizer::new(),
            seed: KMEANS_SEED,
            n_runs: KMEANS_RUNS,
        }
    }

    pub fn with_vectorizer(mut self, config: TfidfConfig) -> Self {
        self.vectorizer = TfidfVectorizer::with_config(config);
        self
    }

    pub fn target_clusters(&self) -> usize {
        self.target_clusters
    }

    /// Number of clusters a corpus of `n` records can support
    pub fn effective_k(&self, n: usize) -> usize {
        self.target_clusters.min(n)
    }

    /// Writes a cluster label into every record
    pub fn assign(&self, records: &mut [StartupRecord], progress: &dyn ProgressSink) -> ClusterMode {
        let mode = self.assign_inner(records, progress);
        telemetry::record_clustering(mode.label());
        mode
    }

    fn assign_inner(&self, records: &mut [StartupRecord], progress: &dyn ProgressSink) -> ClusterMode {
        if records.len() < 2 {
            assign_single(records);
            return ClusterMode::Single;
        }

        progress.report("Clustering startups by description...");

        let k = self.effective_k(records.len());
        if k <= 1 || records.len() <= k {
            assign_single(records);
            progress.report("Too few startups for clustering, all assigned to cluster 0");
            return ClusterMode::Single;
        }

        let corpus: Vec<String> = records.iter().map(StartupRecord::cluster_text).collect();
        let partition = self
            .vectorizer
            .fit_transform(&corpus)
            .and_then(|matrix| self.partition(&matrix, k));

        match partition {
            Ok((labels, k)) => {
                for (record, label) in records.iter_mut().zip(labels) {
                    record.cluster = Some(label);
                }
                progress.report(&format!("Clustering complete: {} clusters created", k));
                tracing::info!(records = records.len(), clusters = k, "K-means clustering complete");
                ClusterMode::KMeans(k)
            }
            Err(e) => {
                assign_single(records);
                progress.report(&format!("Clustering error: {}, assigning all to cluster 0", e));
                tracing::warn!(error = %e, "Clustering degraded to a single cluster");
                ClusterMode::Degraded(e)
            }
        }
    }

    /// Runs k-means over the TF-IDF rows
    ///
    /// Returns the labels and the cluster count actually used. With fewer distinct rows
    /// than `k`, the count drops to the number of distinct rows.
    pub fn partition(&self, matrix: &TfidfMatrix, k: usize) -> Result<(Vec<usize>, usize), ClusteringError> {
        let distinct = distinct_rows(matrix);
        if distinct <= 1 {
            return Err(ClusteringError::TooFewDistinctVectors { distinct, clusters: k });
        }
        if distinct < k {
            tracing::warn!(distinct, requested = k, "Fewer distinct vectors than clusters, reducing k");
        }
        let k = k.min(distinct);

        let n = matrix.n_documents();
        let dataset = Dataset::new(matrix.rows.clone(), Array1::<usize>::zeros(n));
        let rng = Xoshiro256Plus::seed_from_u64(self.seed);

        let model = KMeans::params_with_rng(k, rng)
            .n_runs(self.n_runs)
            .max_n_iterations(300)
            .tolerance(1e-4)
            .fit(&dataset)
            .map_err(|e| ClusteringError::Solver(e.to_string()))?;

        let predictions = model.predict(&dataset);
        let labels: Vec<usize> = predictions.as_targets().iter().copied().collect();

        if labels.iter().any(|&label| label >= k) {
            return Err(ClusteringError::Solver(format!("label out of range for k={}", k)));
        }

        Ok((labels, k))
    }
}

fn assign_single(records: &mut [StartupRecord]) {
    for record in records.iter_mut() {
        record.cluster = Some(0);
    }
}

fn distinct_rows(matrix: &TfidfMatrix) -> usize {
    matrix
        .rows
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|v| v.to_bits()).collect::<Vec<u64>>())
        .collect::<HashSet<_>>()
        .len()
}
