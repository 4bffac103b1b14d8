//! API endpoints.

mod channels;
mod dm;
mod messages;
mod notifications;
mod preferences;
mod profiles;
mod threads;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/profiles", profiles::router())
        .nest("/channels", channels::router().merge(messages::router()))
        .nest("/messages", threads::router())
        .nest("/dm", dm::router())
        .nest("/notifications", notifications::router())
        .nest("/preferences", preferences::router())
}
