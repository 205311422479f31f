use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum MetadataBackend {
    Jsonl,
    Csv,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliOptions {
    /// Output directory for extracted records
    #[arg(short, long, default_value = "./output")]
    pub output: PathBuf,

    /// Optional path to config file (YAML)
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Browser to extract (chrome, firefox, opera, torch, vivaldi, brave,
    /// edge, avast, seamonkey, maxthon). Repeat for several.
    #[arg(short, long)]
    pub browser: Vec<String>,

    /// Profile database for the selected browser; overrides config profiles.
    /// Requires exactly one --browser.
    #[arg(long)]
    pub db: Vec<PathBuf>,

    /// History window in minutes (overrides config when set)
    #[arg(long)]
    pub window_minutes: Option<u64>,

    /// Also extract bookmarks
    #[arg(long)]
    pub bookmarks: bool,

    /// Skip history extraction
    #[arg(long)]
    pub no_history: bool,

    /// Scratch directory for database copies (overrides config when set)
    #[arg(long)]
    pub temp_dir: Option<PathBuf>,

    /// Metadata backend
    #[arg(long, value_enum, default_value_t = MetadataBackend::Jsonl)]
    pub metadata_backend: MetadataBackend,
}

pub fn parse() -> CliOptions {
    CliOptions::parse()
}
