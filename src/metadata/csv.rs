use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use serde::Serialize;

use crate::metadata::{MetadataError, MetadataSink, RunSummary};
use crate::parsers::browser::{BookmarkRecord, HistoryRecord};

pub struct CsvSink {
    run_id: String,
    tool_version: String,
    config_hash: String,
    history_writer: Mutex<csv::Writer<File>>,
    bookmark_writer: Mutex<csv::Writer<File>>,
    run_writer: Mutex<csv::Writer<File>>,
}

#[derive(Serialize)]
struct HistoryCsv<'a> {
    run_id: &'a str,
    browser: &'a str,
    title: Option<&'a str>,
    utc_time: String,
    url: &'a str,
    tool_version: &'a str,
    config_hash: &'a str,
}

#[derive(Serialize)]
struct BookmarkCsv<'a> {
    run_id: &'a str,
    browser: &'a str,
    title: &'a str,
    added_time: Option<String>,
    url: &'a str,
    folder: &'a str,
    tool_version: &'a str,
    config_hash: &'a str,
}

#[derive(Serialize)]
struct RunSummaryCsv<'a> {
    run_id: &'a str,
    browsers: u64,
    paths: u64,
    history_records: u64,
    bookmark_records: u64,
    window_minutes: u64,
    tool_version: &'a str,
    config_hash: &'a str,
}

impl CsvSink {
    pub fn new(
        run_id: &str,
        tool_version: &str,
        config_hash: &str,
        run_output_dir: &Path,
    ) -> Result<Self, MetadataError> {
        let meta_dir = run_output_dir.join("metadata");
        std::fs::create_dir_all(&meta_dir)?;

        let history_file = File::create(meta_dir.join("browser_history.csv"))?;
        let bookmark_file = File::create(meta_dir.join("browser_bookmarks.csv"))?;
        let run_file = File::create(meta_dir.join("run_summary.csv"))?;

        let mut history_writer = csv::WriterBuilder::new().has_headers(false).from_writer(history_file);
        let mut bookmark_writer = csv::WriterBuilder::new().has_headers(false).from_writer(bookmark_file);
        let mut run_writer = csv::WriterBuilder::new().has_headers(false).from_writer(run_file);

        history_writer.write_record([
            "run_id",
            "browser",
            "title",
            "utc_time",
            "url",
            "tool_version",
            "config_hash",
        ])?;

        bookmark_writer.write_record([
            "run_id",
            "browser",
            "title",
            "added_time",
            "url",
            "folder",
            "tool_version",
            "config_hash",
        ])?;

        run_writer.write_record([
            "run_id",
            "browsers",
            "paths",
            "history_records",
            "bookmark_records",
            "window_minutes",
            "tool_version",
            "config_hash",
        ])?;

        Ok(Self {
            run_id: run_id.to_string(),
            tool_version: tool_version.to_string(),
            config_hash: config_hash.to_string(),
            history_writer: Mutex::new(history_writer),
            bookmark_writer: Mutex::new(bookmark_writer),
            run_writer: Mutex::new(run_writer),
        })
    }
}

impl MetadataSink for CsvSink {
    fn record_history(&self, record: &HistoryRecord) -> Result<(), MetadataError> {
        let row = HistoryCsv {
            run_id: &self.run_id,
            browser: record.browser.as_str(),
            title: record.title.as_deref(),
            utc_time: record.utc_time.to_rfc3339(),
            url: &record.url,
            tool_version: &self.tool_version,
            config_hash: &self.config_hash,
        };
        let mut guard = self.history_writer.lock().unwrap();
        guard.serialize(row)?;
        Ok(())
    }

    fn record_bookmark(&self, record: &BookmarkRecord) -> Result<(), MetadataError> {
        let row = BookmarkCsv {
            run_id: &self.run_id,
            browser: record.browser.as_str(),
            title: &record.title,
            added_time: record.added_time.map(|t| t.to_rfc3339()),
            url: &record.url,
            folder: &record.folder,
            tool_version: &self.tool_version,
            config_hash: &self.config_hash,
        };
        let mut guard = self.bookmark_writer.lock().unwrap();
        guard.serialize(row)?;
        Ok(())
    }

    fn record_run_summary(&self, summary: &RunSummary) -> Result<(), MetadataError> {
        let row = RunSummaryCsv {
            run_id: &summary.run_id,
            browsers: summary.browsers,
            paths: summary.paths,
            history_records: summary.history_records,
            bookmark_records: summary.bookmark_records,
            window_minutes: summary.window_minutes,
            tool_version: &self.tool_version,
            config_hash: &self.config_hash,
        };
        let mut guard = self.run_writer.lock().unwrap();
        guard.serialize(row)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), MetadataError> {
        let mut history = self.history_writer.lock().unwrap();
        let mut bookmarks = self.bookmark_writer.lock().unwrap();
        let mut run = self.run_writer.lock().unwrap();
        history.flush()?;
        bookmarks.flush()?;
        run.flush()?;
        Ok(())
    }
}
