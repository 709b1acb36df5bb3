use market_mapper::analysis::{dedup_by_name, generate_summary, Clusterer};
use market_mapper::extraction::parse_response;
use market_mapper::progress::NullSink;
use market_mapper::StartupRecord;
use proptest::prelude::*;
use std::collections::HashSet;

fn record_strategy() -> impl Strategy<Value = StartupRecord> {
    ("[A-Ca-c]{1,3}", "[a-z ]{0,30}").prop_map(|(name, description)| StartupRecord::new(name, description))
}

proptest! {
    #[test]
    fn prop_dedup_shrinks_and_names_are_unique(records in prop::collection::vec(record_strategy(), 0..40)) {
        let before = records.len();

        let result = dedup_by_name(records);

        prop_assert!(result.records.len() <= before);
        prop_assert_eq!(result.records.len() + result.removed, before);
        let keys: HashSet<String> = result.records.iter().map(|r| r.name.to_lowercase()).collect();
        prop_assert_eq!(keys.len(), result.records.len());
    }

    #[test]
    fn prop_tiny_inputs_land_in_cluster_zero(records in prop::collection::vec(record_strategy(), 0..2), k in 0usize..10) {
        let mut records = records;

        Clusterer::new(k).assign(&mut records, &NullSink);

        prop_assert!(records.iter().all(|r| r.cluster == Some(0)));
    }

    #[test]
    fn prop_labels_below_effective_k(records in prop::collection::vec(record_strategy(), 2..12), k in 1usize..8) {
        let mut records = records;
        let clusterer = Clusterer::new(k);
        let effective = clusterer.effective_k(records.len()).max(1);

        clusterer.assign(&mut records, &NullSink);

        prop_assert!(records.iter().all(|r| r.cluster.is_some_and(|c| c < effective)));
    }

    #[test]
    fn prop_embedded_array_recovered(prefix in "[a-zA-Z .,!]{0,40}", suffix in "[a-zA-Z .,!]{0,40}", name in "[A-Za-z]{1,12}") {
        let array = format!(r#"[{{"name":"{}","description":"d","country":"US","category":"AI"}}]"#, name);
        let response = format!("{}\n{}\n{}", prefix, array, suffix);

        let items = parse_response(&response).unwrap();

        prop_assert_eq!(items.len(), 1);
        prop_assert_eq!(items[0]["name"].as_str(), Some(name.as_str()));
    }
}

#[test]
fn test_category_ranking_in_summary() {
    let records: Vec<StartupRecord> = ["AI", "AI", "Fintech", "AI", "Climate"]
        .iter()
        .enumerate()
        .map(|(i, c)| StartupRecord::new(format!("S{}", i), "").with_category(*c))
        .collect();

    let summary = generate_summary(&records);

    let ai = summary.find("AI").unwrap();
    let fintech = summary.find("Fintech").unwrap();
    let climate = summary.find("Climate").unwrap();
    assert!(ai < fintech && fintech < climate);
}
