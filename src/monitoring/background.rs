//! Background polling task for MonitorRegistry

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info};

use super::registry::MonitorRegistry;

/// Handle to the background polling task. Cloning is cheap; dropping every handle does
/// not stop the task.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    stop_tx: Arc<watch::Sender<bool>>,
    done_rx: watch::Receiver<bool>,
}

impl MonitorHandle {
    /// Ask the task to stop. It exits at its next wake-up or immediately if sleeping.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    /// Whether the task is still running.
    ///
    /// A task that panicked drops its sender without reporting completion, so a closed
    /// channel counts as stopped.
    pub fn is_running(&self) -> bool {
        self.done_rx.has_changed().is_ok() && !*self.done_rx.borrow()
    }

    /// Wait until the task has exited
    pub async fn stopped(&self) {
        let mut done_rx = self.done_rx.clone();
        // An error means the task is gone, which is what we are waiting for
        let _ = done_rx.wait_for(|done| *done).await;
    }
}

impl MonitorRegistry {
    /// Start the background polling task.
    ///
    /// Only one task runs per registry: while it is running, every call returns a handle to
    /// that same task. Must be called from within a tokio runtime.
    pub fn start(self: &Arc<Self>) -> MonitorHandle {
        let mut task = self.task.lock();
        if let Some(handle) = task.as_ref() {
            if handle.is_running() {
                debug!("Monitor already running");
                return handle.clone();
            }
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let (done_tx, done_rx) = watch::channel(false);
        let handle = MonitorHandle {
            stop_tx: Arc::new(stop_tx),
            done_rx,
        };

        let registry = Arc::clone(self);
        tokio::spawn(async move {
            registry.run(stop_rx).await;
            done_tx.send_replace(true);
        });

        info!(
            "Batch monitor started (poll every {}s, check every {}s)",
            self.config.poll_interval, self.config.check_interval
        );

        *task = Some(handle.clone());
        handle
    }

    /// The currently running task, if any
    pub fn handle(&self) -> Option<MonitorHandle> {
        self.task
            .lock()
            .as_ref()
            .filter(|handle| handle.is_running())
            .cloned()
    }

    async fn run(&self, mut stop_rx: watch::Receiver<bool>) {
        let poll_interval = self.config.poll_interval();
        let check_interval = self.config.check_interval();
        let mut last_poll = (!self.config.poll_on_start).then(Instant::now);

        loop {
            if *stop_rx.borrow() {
                break;
            }

            let due = last_poll.is_none_or(|at| at.elapsed() >= poll_interval);
            if due {
                let summary = self.poll_once().await;
                last_poll = Some(Instant::now());
                debug!(
                    "Poll cycle done: {} polled, {} changed, {} completed, {} failed",
                    summary.polled,
                    summary.changed(),
                    summary.completed.len(),
                    summary.failed
                );
            }

            tokio::select! {
                _ = tokio::time::sleep(check_interval) => {}
                changed = stop_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("Batch monitor stopped");
    }
}
