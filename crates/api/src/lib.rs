//! HTTP API layer for chattr.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: Profile, channel, message, thread, direct message,
//!   notification, and preference resources
//! - **Middleware**: Shared application state
//! - **Response**: Uniform `{data}` / `{error}` envelope
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
