//! Completion notifications
//!
//! A `Notifier` fans a rendered report out to its channels: SMTP email and HTTP webhook.

mod channels;
mod notifier;


pub use channels::{EmailChannel, Notification, NotificationChannel, WebhookChannel};
pub use notifier::{Notifier, completion_subject};
