//! Helper functions for creating specific error types

use super::types::MonitorError;

/// Helper functions for creating specific errors
impl MonitorError {
    pub fn remote<S: Into<String>>(message: S) -> Self {
        Self::Remote(message.into())
    }

    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render(message.into())
    }

    pub fn delivery<S: Into<String>>(message: S) -> Self {
        Self::Delivery(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the failed operation is worth attempting again on the next poll cycle
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote(_) | Self::HttpClient(_))
    }

    /// Short machine-readable name of the error kind, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Remote(_) => "remote",
            Self::Render(_) => "render",
            Self::Delivery(_) => "delivery",
            Self::Config(_) => "config",
            Self::Database(_) => "database",
            Self::HttpClient(_) => "http_client",
            Self::Serialization(_) => "serialization",
            Self::Yaml(_) => "yaml",
            Self::Io(_) => "io",
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal",
        }
    }
}
