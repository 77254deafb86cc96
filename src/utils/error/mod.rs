//! Error handling for the batch monitor
//!
//! This module defines the error type shared by every component. The monitor core
//! only raises three kinds of its own (`Remote`, `Render`, `Delivery`); the rest wrap
//! failures from the ambient stack (database, HTTP, configuration).

mod helpers;
mod types;

pub use types::{MonitorError, Result};
