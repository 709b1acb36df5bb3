// * JSON Store
// * Non-ASCII text is written literally; serde_json never escapes it.

use crate::config::constants::STARTUPS_EXTRACTED_FILE;
use crate::schema::{SourceRecord, StartupRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// * Longest topic fragment used in a file name
const MAX_TOPIC_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// File-name friendly form of a topic: alphanumerics, space, `-` and `_` only,
/// spaces become underscores
pub fn safe_topic(topic: &str) -> String {
    let kept: String = topic
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();

    kept.trim().replace(' ', "_").chars().take(MAX_TOPIC_CHARS).collect()
}

/// Writes `startups_<topic>.json` plus the shared `startups_extracted.json`
///
/// Returns the topic-specific path.
pub fn save_results(startups: &[StartupRecord], topic: &str, dir: &Path) -> Result<PathBuf, PersistenceError> {
    let path = dir.join(format!("startups_{}.json", safe_topic(topic)));
    write_json(&path, startups)?;

    // * The shared copy is best effort
    let shared = dir.join(STARTUPS_EXTRACTED_FILE);
    if let Err(e) = write_json(&shared, startups) {
        tracing::warn!(error = %e, "Could not write shared startups file");
    }

    tracing::info!(path = %path.display(), count = startups.len(), "Results saved");
    Ok(path)
}

pub fn save_startups(path: &Path, startups: &[StartupRecord]) -> Result<(), PersistenceError> {
    write_json(path, startups)
}

pub fn load_startups(path: &Path) -> Result<Vec<StartupRecord>, PersistenceError> {
    read_json(path)
}

pub fn save_source_records(path: &Path, records: &[SourceRecord]) -> Result<(), PersistenceError> {
    write_json(path, records)
}

pub fn load_source_records(path: &Path) -> Result<Vec<SourceRecord>, PersistenceError> {
    read_json(path)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, json).map_err(io_err)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let raw = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })
}
