use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "passport=info";

/// Installs the stderr subscriber. `RUST_LOG` overrides the default filter.
/// Calling this twice is harmless; the second subscriber is dropped.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
