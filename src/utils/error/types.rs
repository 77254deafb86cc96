//! Error types for the batch monitor

use thiserror::Error;

/// Result type alias for the batch monitor
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Main error type for the batch monitor
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Remote batch API errors (status or result fetch)
    #[error("Remote API error: {0}")]
    Remote(String),

    /// Result rendering errors (unreachable or malformed result set)
    #[error("Render error: {0}")]
    Render(String),

    /// Notification delivery errors
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
