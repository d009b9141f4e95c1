// Stores layer - Data access and repository pattern
pub mod blob_store;
pub mod item_store;

pub use blob_store::BlobStore;
pub use item_store::{ItemStore, ReserveOutcome};
