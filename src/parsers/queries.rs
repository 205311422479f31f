//! Per-family SQL templates and the epoch arithmetic they encode.
//!
//! History queries take one parameter, `?1`, the window cutoff in Unix
//! seconds, and yield `(title, visit_unix, url)` rows ordered by visit time.

use chrono::{DateTime, Utc};

/// Seconds from 1601-01-01 (Windows/WebKit epoch) to 1970-01-01.
pub const WINDOWS_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;
/// Seconds from 1970-01-01 to 2001-01-01 (Cocoa epoch).
pub const MAC_EPOCH_OFFSET_SECS: i64 = 978_307_200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    pub label: &'static str,
    pub sql: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookmarkQuery {
    pub label: &'static str,
    pub sql: &'static str,
}

/// `urls.last_visit_time` is microseconds since 1601-01-01.
pub const CHROMIUM_HISTORY: HistoryQuery = HistoryQuery {
    label: "chromium_history",
    sql: "SELECT title, last_visit_time / 1000000 - 11644473600 AS visit_unix, url \
          FROM urls \
          WHERE last_visit_time / 1000000 - 11644473600 >= ?1 \
          GROUP BY title, last_visit_time \
          ORDER BY last_visit_time ASC",
};

/// `moz_places.last_visit_date` is microseconds since the Unix epoch.
pub const MOZILLA_HISTORY: HistoryQuery = HistoryQuery {
    label: "mozilla_history",
    sql: "SELECT title, last_visit_date / 1000000 AS visit_unix, url \
          FROM moz_places \
          WHERE last_visit_date IS NOT NULL AND last_visit_date / 1000000 >= ?1 \
          GROUP BY title, last_visit_date \
          ORDER BY last_visit_date ASC",
};

/// `zmxhistoryentry.zlastvisittime` is seconds since 2001-01-01, often REAL.
pub const MAXTHON_HISTORY: HistoryQuery = HistoryQuery {
    label: "maxthon_history",
    sql: "SELECT ztitle, CAST(zlastvisittime + 978307200 AS INTEGER) AS visit_unix, zurl \
          FROM zmxhistoryentry \
          WHERE zlastvisittime + 978307200 >= ?1 \
          ORDER BY zlastvisittime ASC",
};

/// Yields `(title, date_added_micros, url, parent_folder_title)`.
pub const MOZILLA_BOOKMARKS: BookmarkQuery = BookmarkQuery {
    label: "mozilla_bookmarks",
    sql: "SELECT b.title, b.dateAdded, p.url, parent.title \
          FROM moz_bookmarks b \
          JOIN moz_places p ON b.fk = p.id \
          LEFT JOIN moz_bookmarks parent ON b.parent = parent.id \
          WHERE p.url LIKE 'http%' AND b.title IS NOT NULL AND b.dateAdded IS NOT NULL",
};

/// Cutoff for a trailing window of `window_minutes` ending at `now`.
pub fn window_cutoff(now: DateTime<Utc>, window_minutes: u64) -> i64 {
    let window_secs = i64::try_from(window_minutes)
        .unwrap_or(i64::MAX)
        .saturating_mul(60);
    now.timestamp().saturating_sub(window_secs)
}

pub fn unix_seconds_to_utc(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(seconds, 0)
}

pub fn unix_micros_to_utc(micros: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_micros(micros)
}

/// Chromium bookmark `date_added` values: microseconds since 1601-01-01,
/// reduced to milliseconds before the epoch shift.
pub fn windows_micros_to_utc(micros: i64) -> Option<DateTime<Utc>> {
    if micros <= 0 {
        return None;
    }
    let millis = micros / 1000 - WINDOWS_EPOCH_OFFSET_SECS * 1000;
    DateTime::<Utc>::from_timestamp_millis(millis)
}

pub fn mac_seconds_to_utc(seconds: i64) -> Option<DateTime<Utc>> {
    unix_seconds_to_utc(seconds.checked_add(MAC_EPOCH_OFFSET_SECS)?)
}
