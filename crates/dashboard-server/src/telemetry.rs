use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global fmt subscriber. `RUST_LOG` wins over the configured filter.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if let Err(error) = fmt().with_env_filter(filter).with_target(true).try_init() {
        eprintln!("tracing subscriber already installed: {error}");
    }
}
