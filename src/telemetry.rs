use sitescore::error::SiteScoreError;
use tracing_subscriber::EnvFilter;

/// Filter precedence: `RUST_LOG`, then `-v`/`-q`, then the configured level.
pub fn init(verbose: u8, quiet: bool, configured: &str) -> Result<(), SiteScoreError> {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => configured,
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|_| SiteScoreError::Telemetry(format!("invalid filter '{level}'")))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(|err| SiteScoreError::Telemetry(err.to_string()))
}
