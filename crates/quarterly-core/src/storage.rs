//! Flat-file outputs: one JSON file per analyzed transcript plus the report.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

use crate::analysis::DocumentRecord;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid record {path}: {source}")]
    InvalidRecord {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Writes `transcript_<i>.json` files into one directory.
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for the record at 1-based input position `index`.
    pub fn record_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("transcript_{index}.json"))
    }

    pub fn save(&self, index: usize, record: &DocumentRecord) -> Result<PathBuf, StorageError> {
        let path = self.record_path(index);
        let json = to_pretty_json(record)?;
        write_file(&path, &json)?;
        tracing::debug!("Saved record to {}", path.display());
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<DocumentRecord, StorageError> {
        let content = fs::read_to_string(path).map_err(|source| StorageError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| StorageError::InvalidRecord {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// JSON with four-space indentation.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, StorageError> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_report(path: &Path, content: &str) -> Result<(), StorageError> {
    write_file(path, content)
}

fn write_file(path: &Path, content: &str) -> Result<(), StorageError> {
    let err = |source: std::io::Error| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(err)?;
    }
    fs::write(path, content).map_err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisResult, ConfidenceScores, SentimentLabel, SentimentScore};
    use tempfile::TempDir;

    fn record() -> DocumentRecord {
        DocumentRecord::new(
            "ADM-Q1-2024.pdf",
            AnalysisResult {
                sentiment: SentimentScore {
                    label: SentimentLabel::Negative,
                    confidence_scores: ConfidenceScores {
                        positive: 0.1,
                        neutral: 0.2,
                        negative: 0.7,
                    },
                },
                key_phrases: vec!["Nutrition".into()],
                summary: "Summary not available.".into(),
            },
        )
    }

    #[test]
    fn test_record_path() {
        let store = RecordStore::new("out");
        assert_eq!(store.record_path(3), PathBuf::from("out/transcript_3.json"));
    }

    #[test]
    fn test_four_space_indent() {
        let json = to_pretty_json(&record()).unwrap();

        assert!(json.starts_with("{\n    \"filename\": \"ADM-Q1-2024.pdf\",\n    \"results\": {\n        \"sentiment\": \"negative\""));
        assert!(json.contains("\n        \"confidence_scores\": {\n            \"positive\": 0.1,"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("nested"));

        let path = store.save(2, &record()).unwrap();

        assert_eq!(path.file_name().unwrap(), "transcript_2.json");
        assert_eq!(RecordStore::load(&path).unwrap(), record());
    }

    #[test]
    fn test_load_invalid_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("transcript_1.json");
        fs::write(&path, "{\"filename\": 3}").unwrap();

        assert!(matches!(
            RecordStore::load(&path),
            Err(StorageError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_load_missing_record() {
        assert!(matches!(
            RecordStore::load(Path::new("/nonexistent/transcript_1.json")),
            Err(StorageError::Read { .. })
        ));
    }
}
