//! Scratch copies must never outlive an extraction call.

mod common;

use std::fs;
use std::path::PathBuf;

use browsersnap::workspace::TempWorkspace;
use browsersnap::{BrowserId, Extractor, ProfilePaths};
use common::{Scratch, chromium_history, minutes_ago, mozilla_places, write_chromium_bookmarks};

fn snapshot_dir(dir: &std::path::Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut out: Vec<_> = fs::read_dir(dir)
        .expect("read_dir")
        .map(|e| e.expect("entry").path())
        .filter(|p| p.is_file())
        .map(|p| {
            let bytes = fs::read(&p).expect("read");
            (p, bytes)
        })
        .collect();
    out.sort();
    out
}

#[test]
fn every_outcome_leaves_scratch_empty() {
    let root = tempfile::tempdir().expect("root");

    let good_chrome = chromium_history(
        &root.path().join("chrome"),
        &[("https://a.test", "A", minutes_ago(1))],
    );
    write_chromium_bookmarks(&good_chrome, "{\"roots\": {}}");

    let good_firefox = mozilla_places(
        &root.path().join("firefox"),
        &[("https://b.test", "B", minutes_ago(1))],
        &[(1, "B", minutes_ago(5))],
    );

    let corrupt_firefox = root.path().join("broken-firefox").join("places.sqlite");
    fs::create_dir_all(corrupt_firefox.parent().expect("parent")).expect("dir");
    fs::write(&corrupt_firefox, vec![0xEEu8; 4096]).expect("write");
    fs::write(root.path().join("broken-firefox").join("places.sqlite-wal"), vec![0x11u8; 512])
        .expect("write wal");

    // A directory where a database file is expected.
    let directory_source = root.path().join("dir-as-db");
    fs::create_dir_all(&directory_source).expect("dir");

    let missing = root.path().join("nope").join("History");

    let mut profiles = ProfilePaths::new();
    profiles.insert(BrowserId::Chrome, good_chrome.clone());
    profiles.insert(BrowserId::Chrome, directory_source);
    profiles.insert(BrowserId::Firefox, good_firefox.clone());
    profiles.insert(BrowserId::Firefox, corrupt_firefox);
    profiles.insert(BrowserId::SeaMonkey, missing);
    profiles.insert(BrowserId::Maxthon, good_chrome.clone());

    let chrome_before = snapshot_dir(good_chrome.parent().expect("parent"));
    let firefox_before = snapshot_dir(good_firefox.parent().expect("parent"));

    let scratch = Scratch::new();
    let extractor = scratch.extractor();

    let history = extractor.all_history(&profiles, 60);
    assert!(scratch.leftovers().is_empty(), "history left {:?}", scratch.leftovers());
    assert_eq!(history.len(), 2);

    let bookmarks = extractor.all_bookmarks(&profiles);
    assert!(scratch.leftovers().is_empty(), "bookmarks left {:?}", scratch.leftovers());
    assert_eq!(bookmarks.len(), 1);

    assert_eq!(snapshot_dir(good_chrome.parent().expect("parent")), chrome_before);
    assert_eq!(snapshot_dir(good_firefox.parent().expect("parent")), firefox_before);
}

#[test]
fn copy_failure_skips_only_that_path() {
    let root = tempfile::tempdir().expect("root");
    let chrome = chromium_history(
        &root.path().join("chrome"),
        &[("https://a.test", "A", minutes_ago(1))],
    );
    write_chromium_bookmarks(
        &chrome,
        r#"{"roots": {"bookmark_bar": {"name": "Bar", "type": "folder", "children": [
            {"name": "Kept", "type": "url", "url": "https://kept.test", "date_added": "13256611200000000"}
        ]}}}"#,
    );
    let firefox = mozilla_places(
        &root.path().join("firefox"),
        &[("https://b.test", "B", minutes_ago(1))],
        &[(1, "B", minutes_ago(5))],
    );
    let chrome_before = snapshot_dir(chrome.parent().expect("parent"));
    let firefox_before = snapshot_dir(firefox.parent().expect("parent"));

    // Every copy into an absent scratch root fails.
    let scratch_root = root.path().join("no-such-scratch");
    let extractor = Extractor::new(TempWorkspace::new(&scratch_root));

    let mut profiles = ProfilePaths::new();
    profiles.insert(BrowserId::Chrome, chrome.clone());
    profiles.insert(BrowserId::Firefox, firefox.clone());

    assert!(extractor.all_history(&profiles, 60).is_empty());

    // Chromium bookmarks are read in place, so they survive the Firefox
    // copy failure.
    let bookmarks = extractor.all_bookmarks(&profiles);
    assert_eq!(bookmarks.len(), 1);
    assert_eq!(bookmarks[0].title, "Kept");
    assert_eq!(bookmarks[0].browser, BrowserId::Chrome);

    assert!(!scratch_root.exists());
    assert_eq!(snapshot_dir(chrome.parent().expect("parent")), chrome_before);
    assert_eq!(snapshot_dir(firefox.parent().expect("parent")), firefox_before);
}

#[test]
fn concurrent_extractors_share_a_scratch_root() {
    let root = tempfile::tempdir().expect("root");
    let db = chromium_history(
        &root.path().join("chrome"),
        &[("https://a.test", "A", minutes_ago(1))],
    );
    let scratch = Scratch::new();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let extractor = scratch.extractor();
                let paths = vec![db.clone()];
                s.spawn(move || extractor.history(BrowserId::Chrome, &paths, 60).len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("join"), 1);
        }
    });
    assert!(scratch.leftovers().is_empty());
}
