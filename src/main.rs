use anyhow::{Result, bail};
use tracing::info;

use browsersnap::{
    cli,
    config,
    logging,
    metadata::{self, RunSummary},
    util,
    workspace::TempWorkspace,
    BrowserId, Extractor,
};

fn main() -> Result<()> {
    logging::init_logging();

    let cli_opts = cli::parse();
    let loaded = config::load_config(cli_opts.config_path.as_deref())?;
    let mut cfg = loaded.config;
    if let Some(window) = cli_opts.window_minutes {
        cfg.window_minutes = window;
    }
    if let Some(temp_dir) = cli_opts.temp_dir.clone() {
        cfg.temp_dir = Some(temp_dir);
    }
    if cli_opts.no_history && !cli_opts.bookmarks {
        bail!("nothing to extract: --no-history without --bookmarks");
    }

    let profiles = util::resolve_profiles(&cfg, &cli_opts)?;
    let run_output_dir = cli_opts.output.join(&cfg.run_id);
    util::ensure_output_dir(&run_output_dir)?;

    let workspace = TempWorkspace::from_override(cfg.temp_dir.as_deref());
    info!(
        "starting run_id={} output={} scratch={} paths={} window_minutes={}",
        cfg.run_id,
        run_output_dir.display(),
        workspace.root().display(),
        profiles.path_count(),
        cfg.window_minutes
    );

    let tool_version = env!("CARGO_PKG_VERSION");
    let sink = metadata::build_sink(
        util::backend_from_cli(cli_opts.metadata_backend),
        &cfg.run_id,
        tool_version,
        &loaded.config_hash,
        &run_output_dir,
    )?;

    let extractor = Extractor::new(workspace);

    let mut history_count = 0u64;
    if !cli_opts.no_history {
        for record in extractor.all_history(&profiles, cfg.window_minutes) {
            sink.record_history(&record)?;
            history_count += 1;
        }
    }

    let mut bookmark_count = 0u64;
    if cli_opts.bookmarks {
        for record in extractor.all_bookmarks(&profiles) {
            sink.record_bookmark(&record)?;
            bookmark_count += 1;
        }
    }

    let browsers = BrowserId::ALL
        .into_iter()
        .filter(|id| !profiles.get(*id).is_empty())
        .count();
    sink.record_run_summary(&RunSummary {
        run_id: cfg.run_id.clone(),
        browsers: browsers as u64,
        paths: profiles.path_count() as u64,
        history_records: history_count,
        bookmark_records: bookmark_count,
        window_minutes: cfg.window_minutes,
    })?;
    sink.flush()?;

    info!(
        "browsersnap run finished: {} history records, {} bookmarks",
        history_count, bookmark_count
    );
    Ok(())
}
