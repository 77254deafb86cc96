//! Monitor scheduling configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scheduling knobs for the background monitor task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between two poll cycles
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
    /// Seconds between two checks of whether a poll cycle is due
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,
    /// Run a poll cycle as soon as the task starts
    #[serde(default = "default_true")]
    pub poll_on_start: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            check_interval: default_check_interval(),
            poll_on_start: true,
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval)
    }
}
