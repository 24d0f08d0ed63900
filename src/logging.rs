use tracing_subscriber::EnvFilter;

/// Install a formatted `tracing` subscriber for the engine's log output.
///
/// `RUST_LOG` takes precedence over `default_level` when set. Calling this
/// more than once, or after another subscriber was installed, is a no-op.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
