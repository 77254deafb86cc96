//! Logging configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level directive (`RUST_LOG` takes precedence)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines on stdout
    #[serde(default)]
    pub json: bool,
    /// Also append plain-text logs to this file
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            file: None,
        }
    }
}
