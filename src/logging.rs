//! Log backend for the binary.
//!
//! Library code logs through the `log` facade; this installs a
//! `tracing-subscriber` formatter on stderr that also receives `log` records.

use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is not set, by number of `-v` flags.
pub fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the stderr logger. `RUST_LOG` takes precedence over `verbosity`.
///
/// Later calls keep the first logger and log the refusal at debug level.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        log::debug!("Logger already installed: {}", e);
    }
}
