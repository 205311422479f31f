//! Shared fixture builders for extraction tests.
//!
//! Each helper writes a minimal profile database with the same table and
//! column names the real browsers use.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;

use browsersnap::Extractor;
use browsersnap::workspace::TempWorkspace;

// ============================================================================
// Timestamp Encoders
// ============================================================================

pub fn to_windows_micros(t: DateTime<Utc>) -> i64 {
    (t.timestamp() + 11_644_473_600) * 1_000_000
}

pub fn to_unix_micros(t: DateTime<Utc>) -> i64 {
    t.timestamp() * 1_000_000
}

pub fn to_mac_seconds(t: DateTime<Utc>) -> f64 {
    (t.timestamp() - 978_307_200) as f64
}

pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    Utc::now() - Duration::minutes(minutes)
}

// ============================================================================
// Profile Builders
// ============================================================================

/// Chromium `History` database with one `urls` row per visit.
pub fn chromium_history(dir: &Path, visits: &[(&str, &str, DateTime<Utc>)]) -> PathBuf {
    fs::create_dir_all(dir).expect("profile dir");
    let path = dir.join("History");
    let conn = Connection::open(&path).expect("conn");
    conn.execute(
        "CREATE TABLE urls (id INTEGER PRIMARY KEY, url LONGVARCHAR, title LONGVARCHAR, \
         visit_count INTEGER DEFAULT 0, last_visit_time INTEGER NOT NULL)",
        [],
    )
    .expect("create urls");
    for (url, title, at) in visits {
        conn.execute(
            "INSERT INTO urls (url, title, last_visit_time) VALUES (?1, ?2, ?3)",
            (url, title, to_windows_micros(*at)),
        )
        .expect("insert url");
    }
    path
}

/// Maxthon history database.
pub fn maxthon_history(dir: &Path, visits: &[(&str, &str, DateTime<Utc>)]) -> PathBuf {
    fs::create_dir_all(dir).expect("profile dir");
    let path = dir.join("History");
    let conn = Connection::open(&path).expect("conn");
    conn.execute(
        "CREATE TABLE zmxhistoryentry (z_pk INTEGER PRIMARY KEY, zhost VARCHAR, \
         ztitle VARCHAR, zurl VARCHAR, zlastvisittime TIMESTAMP)",
        [],
    )
    .expect("create history");
    for (url, title, at) in visits {
        conn.execute(
            "INSERT INTO zmxhistoryentry (zhost, ztitle, zurl, zlastvisittime) VALUES ('', ?1, ?2, ?3)",
            (title, url, to_mac_seconds(*at)),
        )
        .expect("insert entry");
    }
    path
}

/// Mozilla `places.sqlite` schema without rows.
pub fn mozilla_schema(conn: &Connection) {
    conn.execute_batch(
        "CREATE TABLE moz_places (id INTEGER PRIMARY KEY, url LONGVARCHAR, title LONGVARCHAR, \
             last_visit_date INTEGER);
         CREATE TABLE moz_bookmarks (id INTEGER PRIMARY KEY, type INTEGER, fk INTEGER DEFAULT NULL, \
             parent INTEGER, position INTEGER, title LONGVARCHAR, dateAdded INTEGER, lastModified INTEGER);
         INSERT INTO moz_bookmarks (id, type, parent, title, dateAdded) VALUES (1, 2, 0, 'root', 1);
         INSERT INTO moz_bookmarks (id, type, parent, title, dateAdded) VALUES (3, 2, 1, 'toolbar', 1);",
    )
    .expect("mozilla schema");
}

pub fn insert_place(conn: &Connection, id: i64, url: &str, title: &str, at: DateTime<Utc>) {
    conn.execute(
        "INSERT INTO moz_places (id, url, title, last_visit_date) VALUES (?1, ?2, ?3, ?4)",
        (id, url, title, to_unix_micros(at)),
    )
    .expect("insert place");
}

pub fn insert_toolbar_bookmark(conn: &Connection, place_id: i64, title: &str, added: DateTime<Utc>) {
    conn.execute(
        "INSERT INTO moz_bookmarks (type, fk, parent, title, dateAdded) VALUES (1, ?1, 3, ?2, ?3)",
        (place_id, title, to_unix_micros(added)),
    )
    .expect("insert bookmark");
}

/// Mozilla `places.sqlite` in rollback-journal mode with every row in the
/// main file.
pub fn mozilla_places(
    dir: &Path,
    visits: &[(&str, &str, DateTime<Utc>)],
    bookmarks: &[(i64, &str, DateTime<Utc>)],
) -> PathBuf {
    fs::create_dir_all(dir).expect("profile dir");
    let path = dir.join("places.sqlite");
    let conn = Connection::open(&path).expect("conn");
    mozilla_schema(&conn);
    for (i, (url, title, at)) in visits.iter().enumerate() {
        insert_place(&conn, i as i64 + 1, url, title, *at);
    }
    for (place_id, title, added) in bookmarks {
        insert_toolbar_bookmark(&conn, *place_id, title, *added);
    }
    path
}

/// Chromium `Bookmarks` JSON beside `history_db`.
pub fn write_chromium_bookmarks(history_db: &Path, json: &str) -> PathBuf {
    let path = history_db.parent().expect("parent").join("Bookmarks");
    fs::write(&path, json).expect("write bookmarks");
    path
}

// ============================================================================
// Scratch Helpers
// ============================================================================

pub struct Scratch {
    pub dir: tempfile::TempDir,
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("scratch"),
        }
    }

    pub fn extractor(&self) -> Extractor {
        Extractor::new(TempWorkspace::new(self.dir.path()))
    }

    /// Names currently left behind in the scratch directory.
    pub fn leftovers(&self) -> Vec<String> {
        fs::read_dir(self.dir.path())
            .expect("read scratch")
            .map(|e| e.expect("entry").file_name().to_string_lossy().to_string())
            .collect()
    }
}
