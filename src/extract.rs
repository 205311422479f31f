//! # Extraction Dispatcher
//!
//! Routes each browser to its family pipeline. Every candidate path runs
//! snapshot, query, normalize, cleanup to completion before the next path
//! starts. A failing path contributes nothing and never aborts its siblings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::browser::{BookmarkSource, BrowserId};
use crate::parsers::bookmarks;
use crate::parsers::browser::{BookmarkRecord, HistoryRecord};
use crate::parsers::queries::window_cutoff;
use crate::parsers::sqlite_db;
use crate::snapshot;
use crate::workspace::TempWorkspace;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("source not found: {}", path.display())]
    MissingSource { path: PathBuf },
    #[error("copy failed for {}: {source}", path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("query failed for {}: {source}", path.display())]
    Query {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("wal checkpoint could not complete for {}", path.display())]
    Checkpoint { path: PathBuf },
    #[error("malformed bookmark file {}: {source}", path.display())]
    MalformedBookmarks {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("io error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    /// The source file the failure belongs to.
    pub fn path(&self) -> &Path {
        match self {
            ExtractError::MissingSource { path }
            | ExtractError::Copy { path, .. }
            | ExtractError::Query { path, .. }
            | ExtractError::Checkpoint { path }
            | ExtractError::MalformedBookmarks { path, .. }
            | ExtractError::Io { path, .. } => path,
        }
    }
}

/// Candidate database paths per browser, supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct ProfilePaths {
    paths: BTreeMap<BrowserId, Vec<PathBuf>>,
}

impl ProfilePaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, browser: BrowserId, path: impl Into<PathBuf>) {
        self.paths.entry(browser).or_default().push(path.into());
    }

    pub fn set(&mut self, browser: BrowserId, paths: Vec<PathBuf>) {
        self.paths.insert(browser, paths);
    }

    pub fn get(&self, browser: BrowserId) -> &[PathBuf] {
        self.paths.get(&browser).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn path_count(&self) -> usize {
        self.paths.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.path_count() == 0
    }
}

pub struct Extractor {
    workspace: TempWorkspace,
}

impl Extractor {
    pub fn new(workspace: TempWorkspace) -> Self {
        Self { workspace }
    }

    pub fn workspace(&self) -> &TempWorkspace {
        &self.workspace
    }

    /// History visited within the last `window_minutes`, concatenated across
    /// `paths` in order.
    pub fn history(
        &self,
        browser: BrowserId,
        paths: &[PathBuf],
        window_minutes: u64,
    ) -> Vec<HistoryRecord> {
        let mut out = Vec::new();
        for path in paths {
            match self.history_for_path(browser, path, window_minutes) {
                Ok(records) => {
                    debug!(
                        browser = %browser,
                        path = %path.display(),
                        "extracted {} history records",
                        records.len()
                    );
                    out.extend(records);
                }
                Err(err) => report(browser, "history", &err),
            }
        }
        out
    }

    /// Like [`Extractor::history`], but unknown browser names yield nothing.
    pub fn history_by_name(
        &self,
        browser: &str,
        paths: &[PathBuf],
        window_minutes: u64,
    ) -> Vec<HistoryRecord> {
        match browser.parse::<BrowserId>() {
            Ok(id) => self.history(id, paths, window_minutes),
            Err(err) => {
                debug!("{err}; returning no history");
                Vec::new()
            }
        }
    }

    pub fn bookmarks(&self, browser: BrowserId, paths: &[PathBuf]) -> Vec<BookmarkRecord> {
        let mut out = Vec::new();
        for path in paths {
            match self.bookmarks_for_path(browser, path) {
                Ok(records) => {
                    debug!(
                        browser = %browser,
                        path = %path.display(),
                        "extracted {} bookmarks",
                        records.len()
                    );
                    out.extend(records);
                }
                Err(err) => report(browser, "bookmarks", &err),
            }
        }
        out
    }

    pub fn bookmarks_by_name(&self, browser: &str, paths: &[PathBuf]) -> Vec<BookmarkRecord> {
        match browser.parse::<BrowserId>() {
            Ok(id) => self.bookmarks(id, paths),
            Err(err) => {
                debug!("{err}; returning no bookmarks");
                Vec::new()
            }
        }
    }

    /// History for every browser in [`BrowserId::ALL`] order. Each browser
    /// keeps its own ordering; there is no cross-browser sort.
    pub fn all_history(&self, profiles: &ProfilePaths, window_minutes: u64) -> Vec<HistoryRecord> {
        let mut out = Vec::new();
        for browser in BrowserId::ALL {
            out.extend(self.history(browser, profiles.get(browser), window_minutes));
        }
        info!("collected {} history records", out.len());
        out
    }

    /// Bookmarks for every browser, newest first. Undated bookmarks sort last.
    pub fn all_bookmarks(&self, profiles: &ProfilePaths) -> Vec<BookmarkRecord> {
        let mut out = Vec::new();
        for browser in BrowserId::ALL {
            out.extend(self.bookmarks(browser, profiles.get(browser)));
        }
        sort_newest_first(&mut out);
        info!("collected {} bookmarks", out.len());
        out
    }

    fn history_for_path(
        &self,
        browser: BrowserId,
        path: &Path,
        window_minutes: u64,
    ) -> Result<Vec<HistoryRecord>, ExtractError> {
        let family = browser.family();
        let handle = snapshot::acquire(&self.workspace, path, family)?;
        let query_err = |source: rusqlite::Error| ExtractError::Query {
            path: path.to_path_buf(),
            source,
        };
        let conn = handle.open().map_err(query_err)?;
        let cutoff = window_cutoff(Utc::now(), window_minutes);
        let records = sqlite_db::query_history(&conn, family.history_query(), browser, cutoff)
            .map_err(query_err)?;
        drop(conn);
        Ok(records)
    }

    fn bookmarks_for_path(
        &self,
        browser: BrowserId,
        path: &Path,
    ) -> Result<Vec<BookmarkRecord>, ExtractError> {
        let family = browser.family();
        match family.bookmark_source() {
            BookmarkSource::JsonSibling => read_json_bookmarks(browser, path),
            BookmarkSource::Sql(query) => {
                let handle = snapshot::acquire(&self.workspace, path, family)?;
                let query_err = |source: rusqlite::Error| ExtractError::Query {
                    path: path.to_path_buf(),
                    source,
                };
                let conn = handle.open().map_err(query_err)?;
                let records =
                    sqlite_db::query_bookmarks(&conn, query, browser).map_err(query_err)?;
                drop(conn);
                Ok(records)
            }
            BookmarkSource::Unsupported => {
                debug!("bookmark extraction not supported for {browser}");
                Ok(Vec::new())
            }
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(TempWorkspace::system())
    }
}

/// Chromium bookmarks are plain JSON written atomically by the browser, so
/// they are read in place rather than snapshotted.
fn read_json_bookmarks(browser: BrowserId, history_db: &Path) -> Result<Vec<BookmarkRecord>, ExtractError> {
    let path = bookmarks::bookmarks_path(history_db);
    if !path.is_file() {
        return Err(ExtractError::MissingSource { path });
    }
    let text = std::fs::read_to_string(&path).map_err(|source| ExtractError::Io {
        path: path.clone(),
        source,
    })?;
    let file = bookmarks::parse_bookmarks(&text)
        .map_err(|source| ExtractError::MalformedBookmarks { path, source })?;
    Ok(bookmarks::collect_bookmarks(&file, browser))
}

pub fn sort_newest_first(records: &mut [BookmarkRecord]) {
    records.sort_by(|a, b| b.added_time.cmp(&a.added_time));
}

fn report(browser: BrowserId, operation: &str, err: &ExtractError) {
    let path = err.path().display();
    match err {
        ExtractError::MissingSource { .. } => debug!(
            browser = %browser,
            operation,
            path = %path,
            "source missing; skipping"
        ),
        other => warn!(browser = %browser, operation, path = %path, "{other}"),
    }
}
