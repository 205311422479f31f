use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::browser::BrowserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    pub title: Option<String>,
    pub utc_time: DateTime<Utc>,
    pub url: String,
    pub browser: BrowserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookmarkRecord {
    pub title: String,
    pub added_time: Option<DateTime<Utc>>,
    pub url: String,
    pub folder: String,
    pub browser: BrowserId,
}
