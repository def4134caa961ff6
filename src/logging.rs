//! Logging setup for rollbookd.
//!
//! Everything goes to stderr: stdout is the IPC protocol channel and must
//! carry nothing but response lines.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber once at startup. `RUST_LOG` overrides
/// the default `rollbookd=info` filter.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rollbookd=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
