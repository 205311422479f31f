use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::parsers::queries::{self, BookmarkQuery, HistoryQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserId {
    Chrome,
    Firefox,
    Opera,
    Torch,
    Vivaldi,
    Brave,
    Edge,
    Avast,
    SeaMonkey,
    Maxthon,
}

impl BrowserId {
    /// Every supported browser, in aggregate extraction order.
    pub const ALL: [BrowserId; 10] = [
        BrowserId::Chrome,
        BrowserId::Firefox,
        BrowserId::Opera,
        BrowserId::Torch,
        BrowserId::Vivaldi,
        BrowserId::Brave,
        BrowserId::Edge,
        BrowserId::Avast,
        BrowserId::SeaMonkey,
        BrowserId::Maxthon,
    ];

    pub fn family(self) -> BrowserFamily {
        match self {
            BrowserId::Chrome
            | BrowserId::Opera
            | BrowserId::Torch
            | BrowserId::Vivaldi
            | BrowserId::Brave
            | BrowserId::Edge
            | BrowserId::Avast => BrowserFamily::Chromium,
            BrowserId::Firefox | BrowserId::SeaMonkey => BrowserFamily::Mozilla,
            BrowserId::Maxthon => BrowserFamily::Maxthon,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BrowserId::Chrome => "chrome",
            BrowserId::Firefox => "firefox",
            BrowserId::Opera => "opera",
            BrowserId::Torch => "torch",
            BrowserId::Vivaldi => "vivaldi",
            BrowserId::Brave => "brave",
            BrowserId::Edge => "edge",
            BrowserId::Avast => "avast",
            BrowserId::SeaMonkey => "seamonkey",
            BrowserId::Maxthon => "maxthon",
        }
    }
}

impl fmt::Display for BrowserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown browser: {0}")]
pub struct UnknownBrowser(pub String);

impl FromStr for BrowserId {
    type Err = UnknownBrowser;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        BrowserId::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| UnknownBrowser(s.to_string()))
    }
}

/// Browsers grouped by the storage engine and schema they share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserFamily {
    Chromium,
    Mozilla,
    Maxthon,
}

/// How a family's database is brought into the scratch workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotStrategy {
    /// Byte copy of the main database file only.
    SimpleCopy,
    /// Copy the database and its `-wal` log, then checkpoint the copy.
    CopyWithLogFold,
}

/// Where a family keeps its bookmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkSource {
    /// `Bookmarks` JSON file beside the history database.
    JsonSibling,
    /// Relational tables inside the history database.
    Sql(BookmarkQuery),
    Unsupported,
}

impl BrowserFamily {
    pub fn snapshot_strategy(self) -> SnapshotStrategy {
        match self {
            BrowserFamily::Chromium | BrowserFamily::Maxthon => SnapshotStrategy::SimpleCopy,
            BrowserFamily::Mozilla => SnapshotStrategy::CopyWithLogFold,
        }
    }

    pub fn history_query(self) -> HistoryQuery {
        match self {
            BrowserFamily::Chromium => queries::CHROMIUM_HISTORY,
            BrowserFamily::Mozilla => queries::MOZILLA_HISTORY,
            BrowserFamily::Maxthon => queries::MAXTHON_HISTORY,
        }
    }

    pub fn bookmark_source(self) -> BookmarkSource {
        match self {
            BrowserFamily::Chromium => BookmarkSource::JsonSibling,
            BrowserFamily::Mozilla => BookmarkSource::Sql(queries::MOZILLA_BOOKMARKS),
            BrowserFamily::Maxthon => BookmarkSource::Unsupported,
        }
    }

    /// File extension used for scratch copies of this family's database.
    pub fn snapshot_extension(self) -> &'static str {
        match self {
            BrowserFamily::Chromium | BrowserFamily::Maxthon => "db",
            BrowserFamily::Mozilla => "sqlite",
        }
    }
}
