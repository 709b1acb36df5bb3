// * OpenVC Dataset Loader
// * Local JSON file first, otherwise the published dataset over HTTP.

use crate::config::constants::MIN_SOURCE_CONTENT_CHARS;
use crate::research::errors::ResearchError;
use crate::schema::{SourceRecord, UNKNOWN_PUBLISHED};
use serde_json::{Map, Value};
use std::path::Path;

pub const OPENVC_SOURCE: &str = "OpenVC";
const UNKNOWN_STARTUP: &str = "Unknown Startup";

/// Where the dataset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetOrigin {
    Local,
    Remote,
}

pub async fn load_openvc(
    local_path: &Path,
    remote_url: &str,
    client: &reqwest::Client,
) -> Result<(DatasetOrigin, Vec<SourceRecord>), ResearchError> {
    if local_path.exists() {
        let raw = tokio::fs::read_to_string(local_path).await?;
        let data: Value = serde_json::from_str(&raw)?;
        return Ok((DatasetOrigin::Local, dataset_records(&data)));
    }

    let resp = client.get(remote_url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ResearchError::Status(status.as_u16()));
    }

    let data: Value = resp.json().await?;
    Ok((DatasetOrigin::Remote, dataset_records(&data)))
}

/// Maps dataset items to source records
///
/// Accepts a bare array or an object holding `startups` / `data`. A lone object
/// is treated as a single item.
pub fn dataset_records(data: &Value) -> Vec<SourceRecord> {
    let items: Vec<&Value> = match data {
        Value::Array(items) => items.iter().collect(),
        Value::Object(object) => match object.get("startups").or_else(|| object.get("data")) {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(_) => Vec::new(),
            None => vec![data],
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(Value::as_object)
        .map(item_to_record)
        .filter(|record| record.content.chars().count() > MIN_SOURCE_CONTENT_CHARS)
        .collect()
}

fn item_to_record(item: &Map<String, Value>) -> SourceRecord {
    SourceRecord {
        title: first_text(item, &["name", "title"]).unwrap_or_else(|| UNKNOWN_STARTUP.to_string()),
        url: first_text(item, &["url", "website"]).unwrap_or_default(),
        content: first_text(item, &["description", "summary"]).unwrap_or_default(),
        published: first_text(item, &["founded", "date"]).unwrap_or_else(|| UNKNOWN_PUBLISHED.to_string()),
        source: OPENVC_SOURCE.to_string(),
    }
}

// * First present, non-null key; numbers (e.g. a founding year) use their JSON text
fn first_text(item: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match item.get(*key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LONG: &str = "A climate software company building carbon accounting tools for manufacturers.";

    #[test]
    fn test_array_dataset() {
        let data = json!([
            {"name": "Carbonly", "website": "https://carbonly.io", "description": LONG, "founded": 2021},
            {"name": "Tiny", "description": "too short"},
            "not an object"
        ]);

        let records = dataset_records(&data);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Carbonly");
        assert_eq!(records[0].url, "https://carbonly.io");
        assert_eq!(records[0].published, "2021");
        assert_eq!(records[0].source, OPENVC_SOURCE);
    }

    #[test]
    fn test_wrapped_dataset() {
        let data = json!({"startups": [{"title": "Gridly", "summary": LONG}]});

        let records = dataset_records(&data);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Gridly");
        assert_eq!(records[0].published, UNKNOWN_PUBLISHED);
    }

    #[test]
    fn test_single_object_dataset() {
        let records = dataset_records(&json!({"description": LONG}));
        assert_eq!(records[0].title, UNKNOWN_STARTUP);
    }

    #[tokio::test]
    async fn test_local_file_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openvc.json");
        std::fs::write(&path, json!([{"name": "Local", "description": LONG}]).to_string()).unwrap();

        let client = reqwest::Client::new();
        let (origin, records) = load_openvc(&path, "http://127.0.0.1:9/unused", &client)
            .await
            .unwrap();

        assert_eq!(origin, DatasetOrigin::Local);
        assert_eq!(records[0].title, "Local");
    }
}
