use tracing_subscriber::EnvFilter;

/// Set to `json` for line-delimited JSON log output.
pub const LOG_FORMAT_ENV: &str = "BROWSERSNAP_LOG_FORMAT";

/// Installs the global subscriber. Filtering follows `RUST_LOG` and
/// defaults to `info`. Logs go to stderr so record output on stdout stays
/// clean.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(err) = result {
        eprintln!("logging already initialised: {err}");
    }
}
