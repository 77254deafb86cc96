//! Notification channel implementations

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use serde::Serialize;
use tracing::debug;

use crate::config::{SmtpConfig, WebhookConfig};
use crate::utils::error::{MonitorError, Result};

/// Upper bound on a single delivery attempt
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// A message ready for delivery
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
}

/// Notification channel trait
#[async_trait]
pub trait NotificationChannel: Send + Sync + std::fmt::Debug {
    /// Deliver one notification. Single attempt; failures are `Delivery` errors.
    async fn send(&self, notification: &Notification) -> Result<()>;

    /// Get channel name
    fn name(&self) -> &str;
}

/// Email notification channel (SMTP with STARTTLS)
pub struct EmailChannel {
    config: SmtpConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl std::fmt::Debug for EmailChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailChannel")
            .field("server", &self.config.server)
            .field("port", &self.config.port)
            .field("sender", &self.config.sender)
            .field("recipients", &self.config.recipients)
            .finish()
    }
}

impl EmailChannel {
    /// Create a new email notification channel
    pub fn new(config: SmtpConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
            .map_err(|e| MonitorError::config(format!("Invalid SMTP relay {}: {}", config.server, e)))?
            .port(config.port)
            .credentials(Credentials::new(
                config.login().to_string(),
                config.password.clone(),
            ))
            .timeout(Some(DELIVERY_TIMEOUT))
            .build();

        Ok(Self { config, transport })
    }

    /// Build the MIME message for a notification
    pub fn build_message(&self, notification: &Notification) -> Result<Message> {
        let from: Mailbox = self.config.sender.parse().map_err(|e| {
            MonitorError::delivery(format!("Invalid sender {}: {}", self.config.sender, e))
        })?;

        let mut builder = Message::builder()
            .from(from)
            .subject(notification.subject.clone());

        for recipient in &self.config.recipients {
            let to: Mailbox = recipient.parse().map_err(|e| {
                MonitorError::delivery(format!("Invalid recipient {}: {}", recipient, e))
            })?;
            builder = builder.to(to);
        }

        builder
            .header(ContentType::TEXT_HTML)
            .body(notification.html.clone())
            .map_err(|e| MonitorError::delivery(format!("Failed to build email: {}", e)))
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let message = self.build_message(notification)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MonitorError::delivery(format!("Failed to send email: {}", e)))?;

        debug!(
            "Email sent to {} recipient(s) via {}",
            self.config.recipients.len(),
            self.config.server
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "email"
    }
}

/// Webhook notification channel, POSTs the notification as JSON
#[derive(Debug)]
pub struct WebhookChannel {
    url: String,
    client: reqwest::Client,
}

impl WebhookChannel {
    /// Create a new webhook notification channel
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        Self::with_timeout(config, DELIVERY_TIMEOUT)
    }

    /// Create a webhook channel whose requests give up after `timeout`
    pub fn with_timeout(config: &WebhookConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MonitorError::config(format!("Failed to build webhook client: {}", e)))?;

        Ok(Self {
            url: config.url.clone(),
            client,
        })
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await
            .map_err(|e| {
                MonitorError::delivery(format!("Failed to send webhook notification: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(MonitorError::delivery(format!(
                "Webhook returned status: {}",
                response.status()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
