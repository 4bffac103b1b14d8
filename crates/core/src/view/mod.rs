//! Client-session view-model state.
//!
//! These types hold "what the UI should show now" for a single viewer:
//! a [`Timeline`] merges locally-created placeholder records with
//! server-confirmed ones, and a [`ScrollWindow`] grows a visible slice
//! over a resident list without re-rendering the full set.

pub mod reconcile;
pub mod window;

pub use reconcile::{Correlate, PendingState, Timeline};
pub use window::{Direction, ScrollWindow, WindowConfig};
