//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install a stderr fmt subscriber.
///
/// The filter comes from `SELSUB_LOG`, then `RUST_LOG`, then `fallback`. Calling this more than
/// once is harmless.
pub fn init(fallback: &str) {
    let filter = EnvFilter::try_from_env("SELSUB_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
