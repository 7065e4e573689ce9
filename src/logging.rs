//! Diagnostic output for the binary.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding an env-filter directive.
pub const LOG_ENV: &str = "CSHLINK_LOG";

/// Picks the filter: `--verbose` wins, then `CSHLINK_LOG`, then `warn`.
fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs a compact stderr subscriber. Stdout carries the link only.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(verbose: bool) {
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(false).compact();

    let _ = tracing_subscriber::registry().with(filter(verbose)).with(fmt_layer).try_init();
}
