//! Notification channel configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Notification configuration. Every configured channel receives each completion report.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotificationConfig {
    /// SMTP email channel
    #[serde(default)]
    pub email: Option<SmtpConfig>,
    /// HTTP webhook channel
    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
}

impl NotificationConfig {
    /// Whether at least one channel is configured
    pub fn has_channels(&self) -> bool {
        self.email.is_some() || self.webhook.is_some()
    }
}

/// SMTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP relay host
    pub server: String,
    /// SMTP port (STARTTLS)
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Login user name; defaults to the sender address
    #[serde(default)]
    pub username: Option<String>,
    /// Login password
    #[serde(default)]
    pub password: String,
    /// From address
    pub sender: String,
    /// To addresses
    pub recipients: Vec<String>,
}

impl SmtpConfig {
    /// The user name used for SMTP authentication
    pub fn login(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.sender)
    }
}

/// Webhook configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Target URL receiving a JSON POST per report
    pub url: String,
}
