//! # Utility Module
//!
//! Glue between CLI options, configuration and the extractor.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow, bail};
use tracing::warn;

use crate::browser::BrowserId;
use crate::cli::CliOptions;
use crate::config::Config;
use crate::extract::ProfilePaths;
use crate::metadata::MetadataBackendKind;

/// Convert CLI metadata backend to internal enum
pub fn backend_from_cli(backend: crate::cli::MetadataBackend) -> MetadataBackendKind {
    match backend {
        crate::cli::MetadataBackend::Jsonl => MetadataBackendKind::Jsonl,
        crate::cli::MetadataBackend::Csv => MetadataBackendKind::Csv,
    }
}

/// Ensure output directory exists and is writable, warning on unsafe permissions.
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if path.exists() {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_dir() {
            return Err(anyhow!(
                "output path is not a directory: {}",
                path.display()
            ));
        }
    } else {
        std::fs::create_dir_all(path)?;
    }

    let probe_path = path.join(".browsersnap_write_probe");
    match OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&probe_path)
    {
        Ok(_) => {
            let _ = std::fs::remove_file(&probe_path);
        }
        Err(err) => {
            return Err(anyhow!(
                "output directory is not writable: {} ({})",
                path.display(),
                err
            ));
        }
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(path)?.permissions().mode();
        if mode & 0o002 != 0 {
            warn!("output directory is world-writable: {}", path.display());
        }
    }

    Ok(())
}

/// Resolve which browsers to extract and from which databases.
///
/// `--browser` narrows the configured profiles; `--db` replaces the
/// configured paths of a single selected browser.
pub fn resolve_profiles(cfg: &Config, opts: &CliOptions) -> Result<ProfilePaths> {
    let (configured, unknown) = cfg.profile_paths();
    for name in unknown {
        warn!("unknown browser in config profiles: {name}");
    }

    let selected = opts
        .browser
        .iter()
        .map(|name| name.parse::<BrowserId>())
        .collect::<Result<Vec<_>, _>>()?;

    if !opts.db.is_empty() {
        let [browser] = selected.as_slice() else {
            bail!("--db requires exactly one --browser");
        };
        let mut profiles = ProfilePaths::new();
        profiles.set(*browser, opts.db.clone());
        return Ok(profiles);
    }

    if selected.is_empty() {
        return Ok(configured);
    }

    let mut profiles = ProfilePaths::new();
    for browser in selected {
        let paths: Vec<PathBuf> = configured.get(browser).to_vec();
        if paths.is_empty() {
            warn!("no profile databases configured for {browser}");
        }
        profiles.set(browser, paths);
    }
    Ok(profiles)
}
