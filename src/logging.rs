//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Installs the stderr `tracing` subscriber.
///
/// Falls back to `warn` when `filter` is not a valid directive. Calling this
/// twice is harmless; the second call leaves the first subscriber in place.
pub fn init(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
