//! # Snapshot Module
//!
//! Copies a live browser database into the scratch workspace so it can be
//! queried without taking a lock on the original. Mozilla profiles keep
//! recent commits in a `-wal` log; those copies are checkpointed before use.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::browser::{BrowserFamily, SnapshotStrategy};
use crate::extract::ExtractError;
use crate::workspace::TempWorkspace;

const WAL_SUFFIX: &str = "-wal";
const SHM_SUFFIX: &str = "-shm";

/// A private copy of a browser database.
///
/// The copy and its `-wal` / `-shm` companions are deleted when the handle
/// drops, on success and failure paths alike.
#[derive(Debug)]
pub struct SnapshotHandle<'a> {
    workspace: &'a TempWorkspace,
    path: PathBuf,
    companions: [PathBuf; 2],
}

impl<'a> SnapshotHandle<'a> {
    fn new(workspace: &'a TempWorkspace, path: PathBuf) -> Self {
        let companions = [with_suffix(&path, WAL_SUFFIX), with_suffix(&path, SHM_SUFFIX)];
        Self {
            workspace,
            path,
            companions,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn wal_path(&self) -> &Path {
        &self.companions[0]
    }

    /// Opens the copy. The copy is private, so it is opened read-write; the
    /// engine may need to create index files beside a WAL-mode database.
    pub fn open(&self) -> rusqlite::Result<Connection> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }

    /// Paths owned by this handle, including companions that may not exist.
    pub fn owned_paths(&self) -> Vec<&Path> {
        let mut out = vec![self.path.as_path()];
        out.extend(self.companions.iter().map(PathBuf::as_path));
        out
    }
}

impl Drop for SnapshotHandle<'_> {
    fn drop(&mut self) {
        self.workspace.release(&self.owned_paths());
    }
}

/// Copies `source` into `workspace` using the family's strategy.
pub fn acquire<'a>(
    workspace: &'a TempWorkspace,
    source: &Path,
    family: BrowserFamily,
) -> Result<SnapshotHandle<'a>, ExtractError> {
    if !source.is_file() {
        return Err(ExtractError::MissingSource {
            path: source.to_path_buf(),
        });
    }

    let handle = SnapshotHandle::new(workspace, workspace.allocate(family.snapshot_extension()));
    copy_file(source, handle.path())?;

    if family.snapshot_strategy() == SnapshotStrategy::CopyWithLogFold {
        let source_wal = with_suffix(source, WAL_SUFFIX);
        if source_wal.is_file() {
            copy_file(&source_wal, handle.wal_path())?;
        }
        fold_log(&handle, source)?;
    }

    debug!(
        "snapshot of {} ready at {}",
        source.display(),
        handle.path().display()
    );
    Ok(handle)
}

fn copy_file(from: &Path, to: &Path) -> Result<(), ExtractError> {
    let bytes = std::fs::copy(from, to).map_err(|source| ExtractError::Copy {
        path: from.to_path_buf(),
        source,
    })?;
    debug!("copied {} bytes from {}", bytes, from.display());
    Ok(())
}

/// Writes every committed WAL frame back into the copied main file.
fn fold_log(handle: &SnapshotHandle<'_>, source: &Path) -> Result<(), ExtractError> {
    let query_err = |err: rusqlite::Error| ExtractError::Query {
        path: source.to_path_buf(),
        source: err,
    };
    let conn = handle.open().map_err(query_err)?;
    let (busy, log_frames, checkpointed): (i64, i64, i64) = conn
        .query_row("PRAGMA wal_checkpoint(FULL)", [], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })
        .map_err(query_err)?;
    if busy != 0 {
        return Err(ExtractError::Checkpoint {
            path: source.to_path_buf(),
        });
    }
    debug!(
        "checkpointed {} of {} wal frames for {}",
        checkpointed,
        log_frames,
        source.display()
    );
    conn.close().map_err(|(_, err)| query_err(err))?;
    Ok(())
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
