use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

/// Scratch area for database copies.
///
/// Every allocated path is named with a fresh v4 UUID, so concurrent
/// extractions sharing one root never contend for a file.
#[derive(Debug, Clone)]
pub struct TempWorkspace {
    root: PathBuf,
}

impl TempWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Workspace rooted at the platform temp directory (`TMPDIR` aware).
    pub fn system() -> Self {
        Self::new(std::env::temp_dir())
    }

    /// Uses `root` unless it is blank, falling back to the platform temp dir.
    pub fn from_override(root: Option<&Path>) -> Self {
        match root {
            Some(path) if !path.as_os_str().is_empty() => Self::new(path),
            _ => Self::system(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn allocate(&self, extension: &str) -> PathBuf {
        let name = Uuid::new_v4().to_string();
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() {
            self.root.join(name)
        } else {
            self.root.join(format!("{name}.{extension}"))
        }
    }

    /// Delete each path that exists. Missing paths are skipped and other
    /// failures are logged, never returned.
    pub fn release<P: AsRef<Path>>(&self, paths: &[P]) {
        for path in paths {
            let path = path.as_ref();
            match std::fs::remove_file(path) {
                Ok(()) => debug!("removed scratch file {}", path.display()),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => warn!("failed to remove scratch file {}: {err}", path.display()),
            }
        }
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::system()
    }
}
