//! Core business logic for chattr.

pub mod mention;
pub mod services;
pub mod view;

pub use services::*;
pub use view::{Direction, PendingState, ScrollWindow, Timeline, WindowConfig};

/// Generate a unique ID using ULID.
pub fn generate_id() -> String {
    ulid::Ulid::new().to_string().to_lowercase()
}
