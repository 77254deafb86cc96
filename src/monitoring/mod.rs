//! Background batch monitoring
//!
//! This module provides the monitor registry, its polling task and the
//! completion pipeline: status polling, transition detection, result rendering and
//! notification delivery.

// Public submodules
pub mod detector;
pub mod notify;

// Internal submodules
mod background;
mod handler;
mod poller;
mod registry;
mod renderer;
mod types;


// Re-export public types
pub use background::MonitorHandle;
pub use handler::{CompletionHandler, RenderAndNotify};
pub use poller::StatusPoller;
pub use registry::MonitorRegistry;
pub use renderer::{ResultRenderer, format_content, format_text, render_report};
pub use types::{OutcomeCounts, PollSummary, Report, TrackedBatch, Transition};
