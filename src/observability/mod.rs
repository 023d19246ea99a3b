//! Diagnostic logging.
//!
//! Diagnostics go to stderr so they never mix with reports. `RUST_LOG`
//! takes an `EnvFilter` directive (`RUST_LOG=decouple=trace`); without it
//! the `-v` count picks the level. `log` records from the config loader
//! are forwarded through the same subscriber.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Level for a given number of `-v` flags
pub fn level_for_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity).to_string()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();

    tracing::debug!("tracing initialized");
}
