//! Remote batch API configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Anthropic Message Batches API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// API key, sent as `x-api-key`
    #[serde(default)]
    pub api_key: String,
    /// Base URL
    #[serde(default = "default_anthropic_base_url")]
    pub base_url: String,
    /// Value of the `anthropic-version` header
    #[serde(default = "default_anthropic_api_version")]
    pub api_version: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_anthropic_base_url(),
            api_version: default_anthropic_api_version(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl AnthropicConfig {
    /// Create a config for the given key with default endpoints
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Point the client at a different base URL (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
