//! Diagnostic logging
//!
//! Diagnostics go to stderr through `tracing`. The filter is read from
//! `BUILDLEDGER_LOG` (same syntax as `RUST_LOG`) and defaults to `warn`, so
//! normal command output stays clean.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "BUILDLEDGER_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Build the filter from the environment, falling back to the default
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber; later calls are ignored
pub fn init() {
    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(stderr_log.with_filter(env_filter()))
        .try_init();
}
