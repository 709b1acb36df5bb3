// * Insights
// * Aggregate counts over analyzed startups: summary sentence, stats and chart series.

use crate::schema::StartupRecord;
use serde::Serialize;
use std::collections::HashSet;

pub const NO_DATA_MESSAGE: &str = "No data available for insights.";

// * How many leading categories/countries the summary names
const TOP_N: usize = 3;

/// Headline numbers for a result set
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SummaryStats {
    pub total_startups: usize,
    pub unique_countries: usize,
    pub unique_categories: usize,
    pub clusters: usize,
}

/// One bar of a distribution chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Distribution {
    pub value: String,
    pub count: usize,
}

/// Counts values, most frequent first; ties keep first-seen order
pub fn value_counts<'a, I>(values: I) -> Vec<Distribution>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<Distribution> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|d| d.value == value) {
            Some(entry) => entry.count += 1,
            None => counts.push(Distribution {
                value: value.to_string(),
                count: 1,
            }),
        }
    }

    // * Stable sort keeps encounter order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

pub fn category_distribution(records: &[StartupRecord]) -> Vec<Distribution> {
    value_counts(records.iter().map(|r| r.category.as_str()))
}

pub fn country_distribution(records: &[StartupRecord]) -> Vec<Distribution> {
    value_counts(records.iter().map(|r| r.country.as_str()))
}

pub fn distinct_clusters(records: &[StartupRecord]) -> usize {
    records
        .iter()
        .filter_map(|r| r.cluster)
        .collect::<HashSet<_>>()
        .len()
}

pub fn summary_stats(records: &[StartupRecord]) -> SummaryStats {
    SummaryStats {
        total_startups: records.len(),
        unique_countries: records.iter().map(|r| r.country.as_str()).collect::<HashSet<_>>().len(),
        unique_categories: records.iter().map(|r| r.category.as_str()).collect::<HashSet<_>>().len(),
        clusters: distinct_clusters(records),
    }
}

/// Human-readable summary of the analyzed records
pub fn generate_summary(records: &[StartupRecord]) -> String {
    if records.is_empty() {
        return NO_DATA_MESSAGE.to_string();
    }

    let mut sentences = vec![format!("Analysis of {} startups reveals:", records.len())];

    let categories = top_values(&category_distribution(records));
    if !categories.is_empty() {
        sentences.push(format!("Most startups focus on {}.", categories));
    }

    let countries = top_values(&country_distribution(records));
    if !countries.is_empty() {
        sentences.push(format!("Strong presence in {}.", countries));
    }

    let clusters = distinct_clusters(records);
    if clusters > 1 {
        sentences.push(format!("Clustered into {} distinct themes.", clusters));
    }

    sentences.join(" ")
}

fn top_values(distribution: &[Distribution]) -> String {
    distribution
        .iter()
        .take(TOP_N)
        .map(|d| d.value.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
