use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row};
use tracing::debug;

use crate::browser::BrowserId;
use crate::parsers::browser::{BookmarkRecord, HistoryRecord};
use crate::parsers::normalize::{self, RawBookmarkRow, RawHistoryRow};
use crate::parsers::queries::{BookmarkQuery, HistoryQuery, unix_micros_to_utc};

/// Runs a history template against an open snapshot.
pub fn query_history(
    conn: &Connection,
    query: HistoryQuery,
    browser: BrowserId,
    cutoff_unix: i64,
) -> rusqlite::Result<Vec<HistoryRecord>> {
    let mut out = Vec::new();
    let mut stmt = conn.prepare(query.sql)?;
    let rows = stmt.query_map([cutoff_unix], |row| {
        Ok(RawHistoryRow {
            title: text_lossy(row, 0)?,
            visit_unix: row.get(1)?,
            url: text_lossy(row, 2)?,
        })
    })?;

    let mut skipped = 0usize;
    for row in rows {
        match normalize::history_record(row?, browser) {
            Some(record) => out.push(record),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(
            "{}: skipped {} rows with out-of-range visit time",
            query.label, skipped
        );
    }

    Ok(out)
}

/// Runs a relational bookmark template against an open snapshot.
pub fn query_bookmarks(
    conn: &Connection,
    query: BookmarkQuery,
    browser: BrowserId,
) -> rusqlite::Result<Vec<BookmarkRecord>> {
    let mut out = Vec::new();
    let mut stmt = conn.prepare(query.sql)?;
    let rows = stmt.query_map([], |row| {
        let title = text_lossy(row, 0)?;
        let date_added: Option<i64> = row.get(1)?;
        let url = text_lossy(row, 2)?;
        let folder = text_lossy(row, 3)?;
        Ok(RawBookmarkRow {
            title,
            added_time: date_added.and_then(unix_micros_to_utc),
            url,
            folder,
        })
    })?;

    for row in rows {
        out.push(normalize::bookmark_record(row?, browser));
    }

    Ok(out)
}

/// Reads a text column without rejecting the row. Browsers store whatever
/// bytes a page supplied, so invalid UTF-8 is replaced rather than raised.
fn text_lossy(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
        ValueRef::Integer(value) => Some(value.to_string()),
        ValueRef::Real(value) => Some(value.to_string()),
    })
}
