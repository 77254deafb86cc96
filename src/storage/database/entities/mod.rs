/// Batch entity module
pub mod batch;

pub use batch::Entity as Batch;
