use chrono::{DateTime, Utc};

use crate::browser::BrowserId;
use crate::parsers::browser::{BookmarkRecord, HistoryRecord};
use crate::parsers::queries::unix_seconds_to_utc;

pub const UNKNOWN_FOLDER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHistoryRow {
    pub title: Option<String>,
    pub visit_unix: i64,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBookmarkRow {
    pub title: Option<String>,
    pub added_time: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub folder: Option<String>,
}

/// Returns `None` only when the visit time falls outside chrono's range.
pub fn history_record(row: RawHistoryRow, browser: BrowserId) -> Option<HistoryRecord> {
    let utc_time = unix_seconds_to_utc(row.visit_unix)?;
    Some(HistoryRecord {
        title: row.title,
        utc_time,
        url: row.url.unwrap_or_default(),
        browser,
    })
}

pub fn bookmark_record(row: RawBookmarkRow, browser: BrowserId) -> BookmarkRecord {
    BookmarkRecord {
        title: row.title.unwrap_or_default(),
        added_time: row.added_time,
        url: row.url.unwrap_or_default(),
        folder: folder_or_unknown(row.folder),
        browser,
    }
}

pub fn folder_or_unknown(folder: Option<String>) -> String {
    match folder {
        Some(name) if !name.trim().is_empty() => name,
        _ => UNKNOWN_FOLDER.to_string(),
    }
}
