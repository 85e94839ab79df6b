use tracing_subscriber::{EnvFilter, prelude::*, registry};

use crate::config::{LogFormat, LoggingConfig};

/// Builds the filter: `RUST_LOG` wins, otherwise the configured level.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global tracing subscriber. Safe to call more than once; later
/// calls are no-ops.
pub fn init_subscriber(config: &LoggingConfig) {
    let subscriber = registry().with(env_filter(config));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match config.format {
        LogFormat::Json => subscriber.with(fmt_layer.json()).try_init(),
        LogFormat::Human => subscriber.with(fmt_layer).try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_level_falls_back_to_info() {
        let config = LoggingConfig {
            level: "=!=".to_string(),
            format: LogFormat::Human,
        };
        // RUST_LOG may be set by the harness, so only check that building succeeds.
        let _ = env_filter(&config);
    }

    #[test]
    fn init_twice_does_not_panic() {
        let config = LoggingConfig::default();
        init_subscriber(&config);
        init_subscriber(&config);
    }
}
