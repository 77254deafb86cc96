//! Configuration data models
//!
//! This module defines all configuration structures used by the monitor.

#![allow(missing_docs)]

pub mod anthropic;
pub mod logging;
pub mod monitor;
pub mod notification;
pub mod storage;
pub mod submission;

// Re-export all configuration types
pub use anthropic::*;
pub use logging::*;
pub use monitor::*;
pub use notification::*;
pub use storage::*;
pub use submission::*;

pub fn default_true() -> bool {
    true
}

pub fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

pub fn default_anthropic_api_version() -> String {
    "2023-06-01".to_string()
}

pub fn default_request_timeout() -> u64 {
    120
}

pub fn default_connect_timeout() -> u64 {
    10
}

pub fn default_poll_interval() -> u64 {
    300 // 5 minutes
}

pub fn default_check_interval() -> u64 {
    60
}

pub fn default_database_url() -> String {
    "sqlite://data/batchwatch.db?mode=rwc".to_string()
}

pub fn default_max_connections() -> u32 {
    5
}

pub fn default_connection_timeout() -> u64 {
    5
}

pub fn default_smtp_port() -> u16 {
    587
}

pub fn default_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

pub fn default_max_tokens() -> u32 {
    1024
}

pub fn default_max_messages() -> usize {
    10
}

pub fn default_log_level() -> String {
    "info".to_string()
}
