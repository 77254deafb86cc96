//! Configuration management for the monitor
//!
//! This module handles loading, validation, and management of all configuration.
//! Sources, lowest precedence first: built-in defaults, a YAML file, the environment
//! (after `.env` is loaded by `dotenvy`).

mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote batch API
    #[serde(default)]
    pub anthropic: AnthropicConfig,
    /// Background monitor scheduling
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Persistent storage
    #[serde(default)]
    pub storage: StorageConfig,
    /// Notification channels
    #[serde(default)]
    pub notification: NotificationConfig,
    /// Prompt batch defaults
    #[serde(default)]
    pub submission: SubmissionConfig,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file, without environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::read_file(path.as_ref()).await?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse a YAML file without validating it
    async fn read_file(path: &Path) -> Result<Self> {
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| MonitorError::Config(format!("Failed to read config file: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| MonitorError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load `.env`, then the optional file, then apply environment overrides
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        if let Ok(env_path) = dotenvy::dotenv() {
            debug!("Loaded environment from {:?}", env_path);
        }

        Self::load_with(path, |key| std::env::var(key).ok()).await
    }

    /// Read the optional file and apply overrides from `lookup`.
    ///
    /// Validation runs once on the merged result, so a file may leave fields for the
    /// environment to fill in.
    pub async fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::read_file(path).await?,
            None => Self::default(),
        };
        config.apply_env_overrides_from(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.anthropic
            .validate()
            .map_err(|e| MonitorError::Config(format!("Anthropic config error: {}", e)))?;
        self.monitor
            .validate()
            .map_err(|e| MonitorError::Config(format!("Monitor config error: {}", e)))?;
        self.storage
            .database
            .validate()
            .map_err(|e| MonitorError::Config(format!("Database config error: {}", e)))?;
        self.notification
            .validate()
            .map_err(|e| MonitorError::Config(format!("Notification config error: {}", e)))?;
        self.submission
            .validate()
            .map_err(|e| MonitorError::Config(format!("Submission config error: {}", e)))?;
        self.logging
            .validate()
            .map_err(|e| MonitorError::Config(format!("Logging config error: {}", e)))?;

        Ok(())
    }

    /// Fail unless an API key is present; only commands that reach the API need one
    pub fn require_api_key(&self) -> Result<&str> {
        if self.anthropic.api_key.trim().is_empty() {
            return Err(MonitorError::Config(
                "ANTHROPIC_API_KEY (or anthropic.api_key) is required".to_string(),
            ));
        }
        Ok(&self.anthropic.api_key)
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| MonitorError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
