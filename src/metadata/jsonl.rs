use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use serde::Serialize;

use crate::metadata::{MetadataError, MetadataSink, RunSummary};
use crate::parsers::browser::{BookmarkRecord, HistoryRecord};

pub struct JsonlSink {
    run_id: String,
    tool_version: String,
    config_hash: String,
    history_writer: Mutex<BufWriter<File>>,
    bookmark_writer: Mutex<BufWriter<File>>,
    run_writer: Mutex<BufWriter<File>>,
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    run_id: Option<&'a str>,
    #[serde(flatten)]
    record: &'a T,
    tool_version: &'a str,
    config_hash: &'a str,
}

impl JsonlSink {
    pub fn new(
        run_id: &str,
        tool_version: &str,
        config_hash: &str,
        run_output_dir: &Path,
    ) -> Result<Self, MetadataError> {
        let meta_dir = run_output_dir.join("metadata");
        std::fs::create_dir_all(&meta_dir)?;
        let open = |name: &str| -> Result<Mutex<BufWriter<File>>, MetadataError> {
            Ok(Mutex::new(BufWriter::new(File::create(meta_dir.join(name))?)))
        };
        Ok(Self {
            run_id: run_id.to_string(),
            tool_version: tool_version.to_string(),
            config_hash: config_hash.to_string(),
            history_writer: open("browser_history.jsonl")?,
            bookmark_writer: open("browser_bookmarks.jsonl")?,
            run_writer: open("run_summary.jsonl")?,
        })
    }

    /// `run_id` is omitted for records that already carry their own.
    fn write_line<T: Serialize>(
        &self,
        writer: &Mutex<BufWriter<File>>,
        record: &T,
        run_id: Option<&str>,
    ) -> Result<(), MetadataError> {
        let envelope = Envelope {
            run_id,
            record,
            tool_version: &self.tool_version,
            config_hash: &self.config_hash,
        };
        let mut guard = writer.lock().unwrap();
        serde_json::to_writer(&mut *guard, &envelope)?;
        guard.write_all(b"\n")?;
        Ok(())
    }
}

impl MetadataSink for JsonlSink {
    fn record_history(&self, record: &HistoryRecord) -> Result<(), MetadataError> {
        self.write_line(&self.history_writer, record, Some(self.run_id.as_str()))
    }

    fn record_bookmark(&self, record: &BookmarkRecord) -> Result<(), MetadataError> {
        self.write_line(&self.bookmark_writer, record, Some(self.run_id.as_str()))
    }

    fn record_run_summary(&self, summary: &RunSummary) -> Result<(), MetadataError> {
        self.write_line(&self.run_writer, summary, None)
    }

    fn flush(&self) -> Result<(), MetadataError> {
        self.history_writer.lock().unwrap().flush()?;
        self.bookmark_writer.lock().unwrap().flush()?;
        self.run_writer.lock().unwrap().flush()?;
        Ok(())
    }
}
