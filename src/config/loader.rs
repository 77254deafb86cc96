//! Environment variable overrides
//!
//! Variable names follow the ones operators already export for the monitor:
//! `ANTHROPIC_API_KEY`, `SMTP_SERVER`, `SENDER_EMAIL`, and so on.

use super::Config;
use super::models::*;
use tracing::{debug, warn};

impl Config {
    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("Applying environment overrides");

        // Anthropic configuration
        if let Some(api_key) = lookup("ANTHROPIC_API_KEY") {
            self.anthropic.api_key = api_key;
        }
        if let Some(base_url) = lookup("ANTHROPIC_BASE_URL") {
            self.anthropic.base_url = base_url;
        }
        if let Some(version) = lookup("ANTHROPIC_API_VERSION") {
            self.anthropic.api_version = version;
        }

        // Database configuration
        if let Some(url) = lookup("DATABASE_URL") {
            self.storage.database.url = url;
        }

        // Monitor configuration
        if let Some(value) = lookup("POLL_INTERVAL_SECS") {
            match value.parse() {
                Ok(secs) => self.monitor.poll_interval = secs,
                Err(e) => warn!("Ignoring invalid POLL_INTERVAL_SECS '{}': {}", value, e),
            }
        }
        if let Some(value) = lookup("CHECK_INTERVAL_SECS") {
            match value.parse() {
                Ok(secs) => self.monitor.check_interval = secs,
                Err(e) => warn!("Ignoring invalid CHECK_INTERVAL_SECS '{}': {}", value, e),
            }
        }

        // Email configuration
        if let Some(server) = lookup("SMTP_SERVER") {
            let email = self.notification.email.get_or_insert_with(|| SmtpConfig {
                server: String::new(),
                port: default_smtp_port(),
                username: None,
                password: String::new(),
                sender: String::new(),
                recipients: Vec::new(),
            });
            email.server = server;
        }
        if let Some(email) = self.notification.email.as_mut() {
            if let Some(port) = lookup("SMTP_PORT") {
                match port.parse() {
                    Ok(port) => email.port = port,
                    Err(e) => warn!("Ignoring invalid SMTP_PORT '{}': {}", port, e),
                }
            }
            if let Some(sender) = lookup("SENDER_EMAIL") {
                email.sender = sender;
            }
            if let Some(password) = lookup("SENDER_PASSWORD") {
                email.password = password;
            }
            if let Some(username) = lookup("SMTP_USERNAME") {
                email.username = Some(username);
            }
            if let Some(recipients) = lookup("RECIPIENT_EMAIL") {
                email.recipients = recipients
                    .split(',')
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty())
                    .collect();
            }
        }

        // Webhook configuration
        if let Some(url) = lookup("WEBHOOK_URL") {
            self.notification.webhook = Some(WebhookConfig { url });
        }

        // Logging configuration
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(file) = lookup("LOG_FILE") {
            self.logging.file = Some(file);
        }
    }
}
