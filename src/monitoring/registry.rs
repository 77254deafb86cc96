//! Monitor registry
//!
//! Holds the batches under active monitoring and drives the
//! poll, detect, render and notify pipeline for them.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::background::MonitorHandle;
use super::detector::{self, Change};
use super::handler::CompletionHandler;
use super::poller::StatusPoller;
use super::types::{PollSummary, TrackedBatch, Transition};
use crate::config::MonitorConfig;
use crate::core::batch::{BatchApi, ProcessingStatus};
use crate::storage::BatchStore;

/// Transitions kept for inspection
const TRANSITION_HISTORY_LIMIT: usize = 1000;

/// The process's batch monitor.
///
/// Constructed once by the entry point and shared through `Arc`. The submission path
/// adds batches while the background task polls them; both go through one mutex around
/// the active collection, and that mutex is never held across an `.await`.
pub struct MonitorRegistry {
    poller: StatusPoller,
    handler: Arc<dyn CompletionHandler>,
    store: Option<Arc<dyn BatchStore>>,
    pub(super) config: MonitorConfig,
    active: Mutex<HashMap<String, TrackedBatch>>,
    transitions: Mutex<VecDeque<Transition>>,
    pub(super) task: Mutex<Option<MonitorHandle>>,
}

impl MonitorRegistry {
    /// Create a registry with no batches and no running task
    pub fn new(
        api: Arc<dyn BatchApi>,
        handler: Arc<dyn CompletionHandler>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            poller: StatusPoller::new(api),
            handler,
            store: None,
            config,
            active: Mutex::new(HashMap::new()),
            transitions: Mutex::new(VecDeque::new()),
            task: Mutex::new(None),
        }
    }

    /// Record observed status changes in a store
    pub fn with_store(mut self, store: Arc<dyn BatchStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Start monitoring a batch. Returns `false` if it is already monitored.
    pub fn add(&self, batch_id: &str) -> bool {
        let mut active = self.active.lock();
        if active.contains_key(batch_id) {
            debug!("Batch {} is already monitored", batch_id);
            return false;
        }

        active.insert(batch_id.to_string(), TrackedBatch::new(batch_id));
        info!("Added batch {} to monitoring", batch_id);
        true
    }

    /// Stop monitoring a batch
    pub fn remove(&self, batch_id: &str) -> bool {
        self.active.lock().remove(batch_id).is_some()
    }

    pub fn contains(&self, batch_id: &str) -> bool {
        self.active.lock().contains_key(batch_id)
    }

    /// IDs of the monitored batches, oldest registration first
    pub fn active_batches(&self) -> Vec<String> {
        let mut tracked: Vec<TrackedBatch> = self.active.lock().values().cloned().collect();
        tracked.sort_by(|a, b| {
            a.registered_at
                .cmp(&b.registered_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        tracked.into_iter().map(|batch| batch.id).collect()
    }

    /// Snapshot of a monitored batch
    pub fn get(&self, batch_id: &str) -> Option<TrackedBatch> {
        self.active.lock().get(batch_id).cloned()
    }

    /// Last observed status of a monitored batch
    pub fn status_of(&self, batch_id: &str) -> Option<ProcessingStatus> {
        self.active
            .lock()
            .get(batch_id)
            .map(|batch| batch.status.clone())
    }

    pub fn len(&self) -> usize {
        self.active.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.lock().is_empty()
    }

    /// Recorded transitions, oldest first
    pub fn recent_transitions(&self) -> Vec<Transition> {
        self.transitions.lock().iter().cloned().collect()
    }

    /// Run one poll cycle over every monitored batch.
    ///
    /// Statuses are fetched without holding the lock. Batches that reach their terminal
    /// status are handed to the completion handler and removed after the whole cycle.
    /// Failures are logged and never abort the cycle.
    pub async fn poll_once(&self) -> PollSummary {
        let batch_ids = self.active_batches();
        let mut summary = PollSummary::default();
        let mut finished = Vec::new();

        debug!("Checking status of {} batches", batch_ids.len());

        for batch_id in batch_ids {
            summary.polled += 1;

            let status = match self.poller.fetch_status(&batch_id).await {
                Ok(status) => status,
                Err(e) => {
                    error!(
                        error.kind = e.kind(),
                        retryable = e.is_retryable(),
                        "Error checking batch {}: {}",
                        batch_id,
                        e
                    );
                    summary.failed += 1;
                    continue;
                }
            };

            let observation = {
                let mut active = self.active.lock();
                let Some(tracked) = active.get_mut(&batch_id) else {
                    // Removed while its status was being fetched
                    continue;
                };
                let observation = detector::detect(&tracked.status, &status);
                tracked.observe(status.clone());
                observation
            };

            match &observation.change {
                Change::Unchanged => {}
                Change::FirstObservation => {
                    info!("Batch {} status is {}", batch_id, status);
                }
                Change::Transition { from, to } => {
                    info!("Batch {} status changed from {} to {}", batch_id, from, to);
                    let transition = Transition {
                        batch_id: batch_id.clone(),
                        from: from.clone(),
                        to: to.clone(),
                        at: chrono::Utc::now(),
                    };
                    self.record_transition(transition.clone());
                    summary.transitions.push(transition);
                }
            }

            if observation.change != Change::Unchanged {
                if let Some(store) = &self.store {
                    if let Err(e) = store.update_status(&batch_id, &status).await {
                        warn!("Failed to record status of batch {}: {}", batch_id, e);
                    }
                }
            }

            if observation.terminal {
                info!("Batch {} has completed", batch_id);
                if let Err(e) = self.handler.on_completed(&batch_id).await {
                    error!(
                        error.kind = e.kind(),
                        "Error handling completed batch {}: {}",
                        batch_id,
                        e
                    );
                }
                summary.completed.push(batch_id.clone());
                finished.push(batch_id);
            }
        }

        if !finished.is_empty() {
            let mut active = self.active.lock();
            for batch_id in &finished {
                active.remove(batch_id);
            }
        }

        summary
    }

    fn record_transition(&self, transition: Transition) {
        let mut transitions = self.transitions.lock();
        transitions.push_back(transition);
        if transitions.len() > TRANSITION_HISTORY_LIMIT {
            transitions.pop_front();
        }
    }
}
