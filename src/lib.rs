//! # batchwatch
//!
//! Background monitor for asynchronous LLM message batches.
//!
//! Batches submitted to the Anthropic Message Batches API are registered with a
//! [`MonitorRegistry`]. A background task polls their processing status on a fixed
//! schedule, logs every status change and, when a batch ends, renders its results into
//! an HTML report and sends it through the configured notification channels (SMTP email,
//! HTTP webhook). Batch metadata is persisted with SeaORM.
//!
//! ## Features
//!
//! - **Exactly-once completion**: each ended batch is rendered and reported once, then
//!   removed from monitoring
//! - **Lock discipline**: remote calls never run while the registry lock is held
//! - **Cancellable scheduling**: one tokio task per registry, stopped through its handle
//! - **Pluggable seams**: `BatchApi`, `BatchStore`, `CompletionHandler` and
//!   `NotificationChannel` are traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use batchwatch::{BatchWatch, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None).await?;
//!     let app = BatchWatch::new(config).await?;
//!
//!     let batch = app.submission().submit_prompts(&["Summarise RFC 9110"]).await?;
//!     println!("Submitted {}", batch.id);
//!
//!     let handle = app.registry().start();
//!     tokio::signal::ctrl_c().await?;
//!     handle.stop();
//!     handle.stopped().await;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod monitoring;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::batch::{
    AnthropicBatchClient, BatchApi, BatchOutcome, BatchResultItem, MessageBatch,
    ProcessingStatus, SubmissionService,
};
pub use monitoring::{
    CompletionHandler, MonitorHandle, MonitorRegistry, PollSummary, RenderAndNotify, Report,
    ResultRenderer,
};
pub use storage::{BatchRecord, BatchStore, Database};
pub use utils::error::{MonitorError, Result};

use monitoring::notify::Notifier;
use std::sync::Arc;
use tracing::{info, warn};

/// A fully wired monitor: API client, store, registry and submission service
pub struct BatchWatch {
    config: Config,
    store: Arc<Database>,
    registry: Arc<MonitorRegistry>,
    submission: SubmissionService,
}

impl BatchWatch {
    /// Connect to the store, run migrations and assemble the monitor
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating batch monitor");

        let api: Arc<dyn BatchApi> = Arc::new(AnthropicBatchClient::new(config.anthropic.clone())?);
        let store = Arc::new(Database::open(&config.storage.database).await?);

        let notifier = Notifier::from_config(&config.notification)?;
        if !config.notification.has_channels() {
            warn!("No notification channels configured; completed batches will only be logged");
        }

        let handler = RenderAndNotify::new(ResultRenderer::new(api.clone()), notifier);
        let registry = Arc::new(
            MonitorRegistry::new(api.clone(), Arc::new(handler), config.monitor.clone())
                .with_store(store.clone()),
        );

        let submission = SubmissionService::new(
            api,
            store.clone(),
            registry.clone(),
            config.submission.clone(),
        );

        Ok(Self {
            config,
            store,
            registry,
            submission,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<Database> {
        &self.store
    }

    pub fn registry(&self) -> &Arc<MonitorRegistry> {
        &self.registry
    }

    pub fn submission(&self) -> &SubmissionService {
        &self.submission
    }

    /// Register every stored batch that has not ended yet. Returns how many were added.
    pub async fn resume_unfinished(&self) -> Result<usize> {
        let unfinished = self.store.unfinished().await?;
        let added = unfinished
            .iter()
            .filter(|record| self.registry.add(&record.id))
            .count();

        if added > 0 {
            info!("Resumed monitoring of {} stored batches", added);
        }
        Ok(added)
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp (seconds since the epoch)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
