//! Global `tracing` subscriber setup.
//!
//! `RUST_LOG` takes precedence over [`LoggingConfig::level`]. The shorthand values `debug` and
//! `trace` raise only this crate's verbosity and keep dependencies at `warn`.

use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

use crate::config::LoggingConfig;

/// Builds the filter directive for a bare level such as `info`.
fn crate_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("warn,rpc_cache={level},tests={level}"))
}

fn build_filter(config: &LoggingConfig) -> EnvFilter {
    match std::env::var("RUST_LOG") {
        Ok(level) if level == "debug" || level == "trace" => crate_filter(&level),
        Ok(_) => EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| crate_filter("debug")),
        Err(_) => crate_filter(&config.level),
    }
}

/// Installs the global subscriber using `config.format` (`json` or `pretty`).
///
/// # Errors
///
/// Returns [`TryInitError`] if a global subscriber has already been installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(build_filter(config));

    if config.format.as_str() == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_target(false);
        registry.with(fmt_layer).try_init()
    }
}
