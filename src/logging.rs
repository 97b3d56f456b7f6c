//! Logging setup
//!
//! Diagnostics go to stderr so the balance report on stdout stays clean.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `level` when it is set and parses. Calling this more
/// than once returns the error from the second installation attempt.
pub fn init_logging(level: &str) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))
}
