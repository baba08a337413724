use tracing_subscriber::EnvFilter;

/// Route `log` records to stderr, filtered by `RUST_LOG` (default `warn`).
///
/// Stdout is reserved for the marker-framed snapshot and summary output.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
