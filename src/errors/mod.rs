// Errors layer - Error type definitions
pub mod api;
pub mod internal;

// Re-exports for convenience
pub use api::{AdminError, ItemsError};
pub use internal::{InternalError, ItemError, NotificationError};
