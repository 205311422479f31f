//! Chromium `Bookmarks` JSON parsing.
//!
//! The file holds a `roots` map (`bookmark_bar`, `other`, `synced`, ...) of
//! folder nodes. Leaves are emitted depth-first in the order they appear.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::browser::BrowserId;
use crate::parsers::browser::BookmarkRecord;
use crate::parsers::normalize::{self, RawBookmarkRow};
use crate::parsers::queries::windows_micros_to_utc;

pub const BOOKMARKS_FILE_NAME: &str = "Bookmarks";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookmarkFile {
    #[serde(default)]
    pub roots: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Url,
    Folder,
    #[default]
    #[serde(other)]
    Other,
}

/// Chromium writes `date_added` as a decimal string; older profiles and
/// hand-edited files sometimes carry a bare number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DateAdded {
    Text(String),
    Number(i64),
    Float(f64),
}

impl DateAdded {
    fn micros(&self) -> Option<i64> {
        match self {
            DateAdded::Text(text) => text.trim().parse().ok(),
            DateAdded::Number(value) => Some(*value),
            DateAdded::Float(value) if value.is_finite() => Some(*value as i64),
            DateAdded::Float(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookmarkNode {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub date_added: Option<DateAdded>,
    #[serde(default, deserialize_with = "lenient_children")]
    pub children: Vec<BookmarkNode>,
}

/// `null` children mean none, and a child that does not decode is dropped
/// on its own instead of failing its whole root.
fn lenient_children<'de, D>(deserializer: D) -> Result<Vec<BookmarkNode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(node) => Some(node),
            Err(err) => {
                warn!("skipping malformed bookmark node: {err}");
                None
            }
        })
        .collect())
}

/// `Bookmarks` file that sits beside a Chromium `History` database.
pub fn bookmarks_path(history_db: &Path) -> PathBuf {
    history_db
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(BOOKMARKS_FILE_NAME)
}

pub fn parse_bookmarks(json: &str) -> serde_json::Result<BookmarkFile> {
    serde_json::from_str(json)
}

pub fn collect_bookmarks(file: &BookmarkFile, browser: BrowserId) -> Vec<BookmarkRecord> {
    let mut out = Vec::new();
    for (key, value) in &file.roots {
        if !value.is_object() {
            debug!("skipping non-folder bookmark root {key}");
            continue;
        }
        let root: BookmarkNode = match serde_json::from_value(value.clone()) {
            Ok(node) => node,
            Err(err) => {
                warn!("skipping bookmark root {key}: {err}");
                continue;
            }
        };
        let label = match root.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => key.clone(),
        };
        walk(&root, &label, browser, &mut out);
    }
    out
}

fn walk(node: &BookmarkNode, folder: &str, browser: BrowserId, out: &mut Vec<BookmarkRecord>) {
    for child in &node.children {
        match child.kind {
            NodeKind::Url => {
                let row = RawBookmarkRow {
                    title: child.name.clone(),
                    added_time: child
                        .date_added
                        .as_ref()
                        .and_then(DateAdded::micros)
                        .and_then(windows_micros_to_utc),
                    url: child.url.clone(),
                    folder: Some(folder.to_string()),
                };
                out.push(normalize::bookmark_record(row, browser));
            }
            NodeKind::Folder => {
                let label = normalize::folder_or_unknown(child.name.clone());
                walk(child, &label, browser, out);
            }
            NodeKind::Other => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "checksum": "0",
        "roots": {
            "bookmark_bar": {
                "children": [
                    {
                        "date_added": "13256611200000000",
                        "name": "Rust",
                        "type": "url",
                        "url": "https://www.rust-lang.org/"
                    },
                    {
                        "children": [
                            {
                                "date_added": "13256697600000000",
                                "name": "Docs",
                                "type": "url",
                                "url": "https://docs.rs/"
                            }
                        ],
                        "name": "Reference",
                        "type": "folder"
                    }
                ],
                "name": "Bookmarks bar",
                "type": "folder"
            },
            "other": { "children": [], "name": "Other bookmarks", "type": "folder" },
            "sync_transaction_version": "1"
        },
        "version": 1
    }"#;

    #[test]
    fn walks_nested_folders() {
        let file = parse_bookmarks(FIXTURE).expect("parse");
        let records = collect_bookmarks(&file, BrowserId::Chrome);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].title, "Rust");
        assert_eq!(records[0].folder, "Bookmarks bar");
        assert_eq!(records[1].title, "Docs");
        assert_eq!(records[1].folder, "Reference");

        let added = records[1].added_time.expect("added time");
        assert_eq!(added.to_rfc3339(), "2021-02-02T00:00:00+00:00");
    }

    #[test]
    fn unnamed_nodes_fall_back() {
        let json = r#"{
            "roots": {
                "synced": {
                    "children": [
                        { "name": "a", "type": "url", "url": "https://a.test" },
                        { "type": "folder", "children": [
                            { "name": "b", "type": "url", "url": "https://b.test", "date_added": 13256611200000000 }
                        ] }
                    ],
                    "type": "folder"
                }
            }
        }"#;
        let file = parse_bookmarks(json).expect("parse");
        let records = collect_bookmarks(&file, BrowserId::Edge);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].folder, "synced");
        assert_eq!(records[0].added_time, None);
        assert_eq!(records[1].folder, "Unknown");
        assert!(records[1].added_time.is_some());
        assert!(records.iter().all(|r| r.browser == BrowserId::Edge));
    }

    #[test]
    fn bad_nodes_do_not_drop_their_root() {
        let json = r#"{
            "roots": {
                "bookmark_bar": {
                    "name": "Bar",
                    "type": "folder",
                    "children": [
                        { "name": "Empty", "type": "folder", "children": null },
                        { "name": "Float", "type": "url", "url": "https://float.test", "date_added": 13256611200000000.0 },
                        { "name": "Broken", "type": "url", "url": 42 },
                        { "name": "Kept", "type": "url", "url": "https://kept.test" }
                    ]
                },
                "sync_transaction_version": "1"
            }
        }"#;
        let file = parse_bookmarks(json).expect("parse");
        let records = collect_bookmarks(&file, BrowserId::Chrome);
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Float", "Kept"]);
        assert_eq!(
            records[0].added_time.map(|t| t.to_rfc3339()),
            Some("2021-02-01T00:00:00+00:00".to_string())
        );
        assert!(records.iter().all(|r| r.folder == "Bar"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_bookmarks("{ \"roots\": ").is_err());
    }

    #[test]
    fn sibling_path_shares_profile_dir() {
        let path = bookmarks_path(Path::new("/profiles/Default/History"));
        assert_eq!(path, Path::new("/profiles/Default/Bookmarks"));
    }
}
