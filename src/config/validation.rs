//! Configuration validation
//!
//! This module provides validation logic for all configuration structures.

use super::models::*;
use crate::utils::error::{MonitorError, Result};
use tracing::debug;
use url::Url;

/// Configuration validation trait
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn validate_http_url(url_str: &str, context: &str) -> Result<()> {
    let url = Url::parse(url_str)
        .map_err(|e| MonitorError::Config(format!("{} has invalid URL format: {}", context, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(MonitorError::Config(format!(
            "{} must use http:// or https:// scheme, got: {}",
            context, scheme
        ))),
    }
}

fn looks_like_email(address: &str) -> bool {
    match address.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

impl Validate for AnthropicConfig {
    fn validate(&self) -> Result<()> {
        debug!("Validating anthropic configuration");

        validate_http_url(&self.base_url, "Anthropic base URL")?;

        if self.api_version.is_empty() {
            return Err(MonitorError::Config("API version cannot be empty".to_string()));
        }

        if self.request_timeout == 0 {
            return Err(MonitorError::Config(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Validate for MonitorConfig {
    fn validate(&self) -> Result<()> {
        debug!("Validating monitor configuration");

        if self.poll_interval == 0 {
            return Err(MonitorError::Config(
                "Poll interval must be greater than 0".to_string(),
            ));
        }

        if self.check_interval == 0 {
            return Err(MonitorError::Config(
                "Check interval must be greater than 0".to_string(),
            ));
        }

        if self.check_interval > self.poll_interval {
            return Err(MonitorError::Config(format!(
                "Check interval ({}s) cannot exceed poll interval ({}s)",
                self.check_interval, self.poll_interval
            )));
        }

        Ok(())
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(MonitorError::Config("Database URL cannot be empty".to_string()));
        }

        if self.max_connections == 0 {
            return Err(MonitorError::Config(
                "Database max connections must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Validate for NotificationConfig {
    fn validate(&self) -> Result<()> {
        if let Some(email) = &self.email {
            email.validate()?;
        }
        if let Some(webhook) = &self.webhook {
            webhook.validate()?;
        }
        Ok(())
    }
}

impl Validate for SmtpConfig {
    fn validate(&self) -> Result<()> {
        debug!("Validating SMTP configuration");

        if self.server.is_empty() {
            return Err(MonitorError::Config("SMTP server cannot be empty".to_string()));
        }

        if self.port == 0 {
            return Err(MonitorError::Config("SMTP port cannot be 0".to_string()));
        }

        if !looks_like_email(&self.sender) {
            return Err(MonitorError::Config(format!(
                "Sender '{}' is not a valid email address",
                self.sender
            )));
        }

        if self.recipients.is_empty() {
            return Err(MonitorError::Config(
                "At least one recipient must be configured".to_string(),
            ));
        }

        if let Some(bad) = self.recipients.iter().find(|r| !looks_like_email(r)) {
            return Err(MonitorError::Config(format!(
                "Recipient '{}' is not a valid email address",
                bad
            )));
        }

        Ok(())
    }
}

impl Validate for WebhookConfig {
    fn validate(&self) -> Result<()> {
        validate_http_url(&self.url, "Webhook URL")
    }
}

impl Validate for SubmissionConfig {
    fn validate(&self) -> Result<()> {
        if self.model.is_empty() {
            return Err(MonitorError::Config("Model cannot be empty".to_string()));
        }

        if self.max_tokens == 0 {
            return Err(MonitorError::Config(
                "Max tokens must be greater than 0".to_string(),
            ));
        }

        if self.max_messages == 0 {
            return Err(MonitorError::Config(
                "Max messages must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<()> {
        if self.level.trim().is_empty() {
            return Err(MonitorError::Config("Log level cannot be empty".to_string()));
        }
        Ok(())
    }
}
