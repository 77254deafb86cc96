// Module declarations
mod batch_ops;
mod connection;
mod types;


// Re-export public types
pub use types::{DatabaseBackendType, SeaOrmDatabase};
