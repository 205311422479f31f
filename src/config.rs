use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::browser::BrowserId;
use crate::extract::ProfilePaths;

fn default_window_minutes() -> u64 {
    1440
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub run_id: String,
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u64,
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
    /// Browser name to candidate database paths.
    #[serde(default)]
    pub profiles: BTreeMap<String, Vec<PathBuf>>,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub config_hash: String,
}

impl Config {
    /// Resolves configured profiles. Names that are not supported browsers
    /// are returned alongside so the caller can warn about them.
    pub fn profile_paths(&self) -> (ProfilePaths, Vec<String>) {
        let mut profiles = ProfilePaths::new();
        let mut unknown = Vec::new();
        for (name, paths) in &self.profiles {
            match name.parse::<BrowserId>() {
                Ok(id) => {
                    for path in paths {
                        profiles.insert(id, path.clone());
                    }
                }
                Err(_) => unknown.push(name.clone()),
            }
        }
        (profiles, unknown)
    }
}

pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig> {
    let bytes: Vec<u8> = if let Some(p) = path {
        std::fs::read(p)?
    } else {
        include_bytes!("../config/default.yml").to_vec()
    };

    let mut config: Config = serde_yaml::from_slice(&bytes)?;
    if config.run_id.trim().is_empty() {
        config.run_id = generate_run_id();
    }

    let config_hash = hash_bytes(&bytes);

    Ok(LoadedConfig { config, config_hash })
}

fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn generate_run_id() -> String {
    let now = chrono::Utc::now();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}", now.format("%Y%m%dT%H%M%SZ"), &suffix[..8])
}
