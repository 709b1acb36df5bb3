use market_mapper::persistence::{
    load_source_records, load_startups, save_results, save_source_records, PersistenceError,
};
use market_mapper::{SourceRecord, StartupRecord};

#[test]
fn test_startups_round_trip_with_optional_fields() {
    let dir = tempfile::tempdir().unwrap();
    let mut acme = StartupRecord::new("Acme", "AI platform")
        .with_country("US")
        .with_category("AI")
        .with_url("https://acme.io");
    acme.cluster = Some(2);
    acme.enriched = Some(true);
    let plain = StartupRecord::new("Beta", "");

    let path = save_results(&[acme.clone(), plain.clone()], "AI", dir.path()).unwrap();
    let loaded = load_startups(&path).unwrap();

    assert_eq!(loaded, vec![acme, plain]);
}

#[test]
fn test_non_ascii_written_literally() {
    let dir = tempfile::tempdir().unwrap();
    let record = StartupRecord::new("Café Génie", "Münchner KI-Startup 東京").with_country("Deutschland");

    let path = save_results(&[record], "Europe", dir.path()).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();

    assert!(raw.contains("Café Génie"));
    assert!(raw.contains("東京"));
    assert!(!raw.contains("\\u"));
    // * Pretty printed
    assert!(raw.starts_with("[\n  {"));
}

#[test]
fn test_shared_copy_matches_topic_file() {
    let dir = tempfile::tempdir().unwrap();

    let path = save_results(&[StartupRecord::new("Acme", "")], "Climate Tech", dir.path()).unwrap();

    assert!(path.ends_with("startups_Climate_Tech.json"));
    let shared = std::fs::read_to_string(dir.path().join("startups_extracted.json")).unwrap();
    assert_eq!(shared, std::fs::read_to_string(&path).unwrap());
}

#[test]
fn test_source_records_round_trip_in_nested_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("rss_articles.json");
    let records = vec![SourceRecord::new("Title", "Body", "feed")
        .with_url("https://example.com/a")
        .with_published("2025-01-06")];

    save_source_records(&path, &records).unwrap();

    assert_eq!(load_source_records(&path).unwrap(), records);
}

#[test]
fn test_malformed_json_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "[{\"name\":").unwrap();

    assert!(matches!(load_startups(&path), Err(PersistenceError::Json { .. })));
}
