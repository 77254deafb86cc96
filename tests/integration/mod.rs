//! Integration tests for batchwatch
//!
//! These tests exercise the public API against real SQLite databases and a mock HTTP
//! server standing in for the batch API.

pub mod anthropic_client_tests;
pub mod config_tests;
pub mod database_tests;
pub mod monitor_tests;
