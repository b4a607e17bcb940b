//! Logging setup.
//!
//! Diagnostics go to stderr through `tracing`; stdout is reserved for command
//! output. `RUST_LOG` wins over `--debug`, which wins over the config's
//! `log_filter`.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(config_filter: &str, debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_directive(config_filter, debug)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn fallback_directive(config_filter: &str, debug: bool) -> &str {
    if debug { "debug" } else { config_filter }
}
