// * Name Deduplication
// * Drops startups whose lower-cased name was already seen; first occurrence wins.

use crate::schema::StartupRecord;
use std::collections::HashSet;

/// Result of a deduplication pass
#[derive(Debug, Clone, PartialEq)]
pub struct DedupResult {
    pub records: Vec<StartupRecord>,
    pub removed: usize,
}

/// Removes case-insensitive duplicate names, keeping order
pub fn dedup_by_name(records: Vec<StartupRecord>) -> DedupResult {
    let before = records.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(before);

    let records: Vec<StartupRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.name_key()))
        .collect();

    let removed = before - records.len();
    if removed > 0 {
        tracing::debug!(removed, kept = records.len(), "Duplicate startups removed");
    }

    DedupResult { records, removed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Vec<StartupRecord> {
        names.iter().map(|n| StartupRecord::new(*n, "")).collect()
    }

    #[test]
    fn test_case_insensitive_first_wins() {
        let mut input = named(&["Acme", "Beta", "ACME", "acme", "Gamma"]);
        input[0].description = "first".to_string();

        let result = dedup_by_name(input);

        let names: Vec<&str> = result.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Beta", "Gamma"]);
        assert_eq!(result.records[0].description, "first");
        assert_eq!(result.removed, 2);
    }

    #[test]
    fn test_empty_input() {
        let result = dedup_by_name(Vec::new());
        assert!(result.records.is_empty());
        assert_eq!(result.removed, 0);
    }
}
