//! Completion handling for ended batches

use async_trait::async_trait;
use tracing::info;

use super::notify::Notifier;
use super::renderer::ResultRenderer;
use crate::utils::error::Result;

/// Invoked once per batch when it reaches its terminal status.
///
/// Errors are logged by the registry; the batch is removed from monitoring either way.
#[async_trait]
pub trait CompletionHandler: Send + Sync {
    async fn on_completed(&self, batch_id: &str) -> Result<()>;
}

/// Render the results, then notify. A render failure skips the notification.
pub struct RenderAndNotify {
    renderer: ResultRenderer,
    notifier: Notifier,
}

impl RenderAndNotify {
    pub fn new(renderer: ResultRenderer, notifier: Notifier) -> Self {
        Self { renderer, notifier }
    }
}

#[async_trait]
impl CompletionHandler for RenderAndNotify {
    async fn on_completed(&self, batch_id: &str) -> Result<()> {
        let report = self.renderer.render(batch_id).await?;
        info!(
            "Rendered {} results for batch {} ({} succeeded, {} errored)",
            report.counts.total(),
            batch_id,
            report.counts.succeeded,
            report.counts.errored
        );

        self.notifier.notify(batch_id, &report).await?;
        info!("Successfully processed completed batch {}", batch_id);
        Ok(())
    }
}
