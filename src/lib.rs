//! # browsersnap
//!
//! Lock-safe extraction of browsing history and bookmarks from Chromium,
//! Mozilla and Maxthon profile databases.
//!
//! Every database is copied into a scratch workspace before it is opened, so
//! a browser holding the original open is never blocked or written to. The
//! copies are removed again before each extraction call returns.
//!
//! - `browser` - browser identifiers and their storage families
//! - `workspace` - scratch path allocation and cleanup
//! - `snapshot` - database copies, including WAL folding for Mozilla
//! - `parsers` - query catalog, row normalization, bookmark tree walking
//! - `extract` - the dispatcher used by callers
//! - `metadata` - JSONL and CSV sinks for extracted records

pub mod browser;
pub mod cli;
pub mod config;
pub mod extract;
pub mod logging;
pub mod metadata;
pub mod parsers;
pub mod snapshot;
pub mod util;
pub mod workspace;

pub use browser::{BrowserFamily, BrowserId};
pub use extract::{ExtractError, Extractor, ProfilePaths};
pub use parsers::browser::{BookmarkRecord, HistoryRecord};
