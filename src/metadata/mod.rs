pub mod csv;
pub mod jsonl;

use std::path::Path;

use thiserror::Error;

use crate::parsers::browser::{BookmarkRecord, HistoryRecord};

#[derive(Debug, Clone, serde::Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub browsers: u64,
    pub paths: u64,
    pub history_records: u64,
    pub bookmark_records: u64,
    pub window_minutes: u64,
}

#[derive(Debug, Clone, Copy)]
pub enum MetadataBackendKind {
    Jsonl,
    Csv,
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Output sink for extracted records.
///
/// # Example
/// ```rust
/// use browsersnap::metadata::{self, MetadataBackendKind, RunSummary};
///
/// let run_output_dir = std::env::temp_dir().join("browsersnap_meta_example");
/// std::fs::create_dir_all(&run_output_dir).unwrap();
///
/// let sink = metadata::build_sink(
///     MetadataBackendKind::Jsonl,
///     "example_run",
///     "0.1.0",
///     "",
///     &run_output_dir,
/// )
/// .unwrap();
///
/// let summary = RunSummary {
///     run_id: "example_run".to_string(),
///     browsers: 0,
///     paths: 0,
///     history_records: 0,
///     bookmark_records: 0,
///     window_minutes: 60,
/// };
/// sink.record_run_summary(&summary).unwrap();
/// sink.flush().unwrap();
/// ```
pub trait MetadataSink: Send + Sync {
    fn record_history(&self, record: &HistoryRecord) -> Result<(), MetadataError>;
    fn record_bookmark(&self, record: &BookmarkRecord) -> Result<(), MetadataError>;
    fn record_run_summary(&self, summary: &RunSummary) -> Result<(), MetadataError>;
    fn flush(&self) -> Result<(), MetadataError>;
}

pub fn build_sink(
    backend: MetadataBackendKind,
    run_id: &str,
    tool_version: &str,
    config_hash: &str,
    run_output_dir: &Path,
) -> Result<Box<dyn MetadataSink>, MetadataError> {
    match backend {
        MetadataBackendKind::Jsonl => Ok(Box::new(jsonl::JsonlSink::new(
            run_id,
            tool_version,
            config_hash,
            run_output_dir,
        )?)),
        MetadataBackendKind::Csv => Ok(Box::new(csv::CsvSink::new(
            run_id,
            tool_version,
            config_hash,
            run_output_dir,
        )?)),
    }
}
