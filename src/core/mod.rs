//! Core domain: message batches and the remote batch API

pub mod batch;
