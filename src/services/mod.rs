// Services layer - Image preparation and outbound notifications
pub mod image;
pub mod notifier;

pub use image::{prepare, ImageError, PreparedImage};
pub use notifier::{DisabledNotifier, ResendNotifier, ReservationNotifier};
