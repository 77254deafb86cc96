//! Logging setup
//!
//! Installs the global `tracing` subscriber: stdout output (plain or JSON), an optional
//! append-only log file, and an `EnvFilter` where `RUST_LOG` overrides the configured level.

use crate::config::LoggingConfig;
use crate::utils::error::{MonitorError, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Build the filter directive for the configured level
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // sqlx is chatty at info; keep it at warn unless asked otherwise
        EnvFilter::new(format!("{},sqlx=warn,sea_orm=warn", config.level))
    })
}

/// Initialize the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let stdout_layer = if config.json {
        fmt::layer().json().with_target(false).boxed()
    } else {
        fmt::layer().with_target(false).boxed()
    };

    let file_layer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    MonitorError::config(format!("Failed to open log file '{}': {}", path, e))
                })?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| MonitorError::internal(format!("Failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_uses_configured_level() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            ..Default::default()
        };
        let filter = env_filter(&config);
        if std::env::var("RUST_LOG").is_err() {
            assert!(filter.to_string().contains("debug"));
        }
    }

    #[test]
    fn test_init_logging_rejects_unwritable_file() {
        let config = LoggingConfig {
            file: Some("/nonexistent-dir/batchwatch.log".to_string()),
            ..Default::default()
        };
        let result = init_logging(&config);
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }
}
