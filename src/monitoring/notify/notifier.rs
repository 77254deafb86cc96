//! Report delivery over every configured channel

use std::sync::Arc;

use tracing::{error, info, warn};

use super::channels::{EmailChannel, Notification, NotificationChannel, WebhookChannel};
use crate::config::NotificationConfig;
use crate::monitoring::types::Report;
use crate::utils::error::{MonitorError, Result};

/// Subject line of a completion notification
pub fn completion_subject(batch_id: &str) -> String {
    format!("Batch Processing Complete - {}", batch_id)
}

/// Sends completion reports
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl Notifier {
    pub fn new(channels: Vec<Arc<dyn NotificationChannel>>) -> Self {
        Self { channels }
    }

    /// Build the channels named in the configuration
    pub fn from_config(config: &NotificationConfig) -> Result<Self> {
        let mut channels: Vec<Arc<dyn NotificationChannel>> = Vec::new();

        if let Some(smtp) = &config.email {
            channels.push(Arc::new(EmailChannel::new(smtp.clone())?));
        }

        if let Some(webhook) = &config.webhook {
            channels.push(Arc::new(WebhookChannel::new(webhook)?));
        }

        Ok(Self::new(channels))
    }

    /// Names of the configured channels
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|channel| channel.name()).collect()
    }

    /// Send the report once through every channel.
    ///
    /// Every channel is attempted even when an earlier one fails; any failure makes the
    /// whole delivery a `Delivery` error.
    pub async fn notify(&self, batch_id: &str, report: &Report) -> Result<()> {
        if self.channels.is_empty() {
            warn!(
                "No notification channels configured, report for batch {} not sent",
                batch_id
            );
            return Ok(());
        }

        let notification = Notification {
            subject: completion_subject(batch_id),
            html: report.html.clone(),
            batch_id: Some(batch_id.to_string()),
        };

        let mut failures = Vec::new();
        for channel in &self.channels {
            match channel.send(&notification).await {
                Ok(()) => info!("Notification for batch {} sent via {}", batch_id, channel.name()),
                Err(e) => {
                    error!(
                        "Failed to send notification for batch {} via {}: {}",
                        batch_id,
                        channel.name(),
                        e
                    );
                    failures.push(format!("{}: {}", channel.name(), e));
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(MonitorError::delivery(failures.join("; ")))
        }
    }
}
