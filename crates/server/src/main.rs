//! Chattr server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use chattr_api::{AppState, router as api_router};
use chattr_common::Config;
use chattr_core::{
    ChannelService, DirectMessageService, MessageService, NotificationService, PreferenceService,
    ProfileService, ThreadService,
};
use chattr_db::repositories::{
    ChannelRepository, DirectMessageRepository, MessageRepository, NotificationRepository,
    PreferenceRepository, ProfileRepository, ThreadMessageRepository,
};
use axum::Router;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chattr=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting chattr server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = chattr_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    chattr_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let profile_repo = ProfileRepository::new(Arc::clone(&db));
    let channel_repo = ChannelRepository::new(Arc::clone(&db));
    let message_repo = MessageRepository::new(Arc::clone(&db));
    let thread_repo = ThreadMessageRepository::new(Arc::clone(&db));
    let dm_repo = DirectMessageRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));
    let preference_repo = PreferenceRepository::new(Arc::clone(&db));

    // Initialize services
    let notification_service =
        NotificationService::new(notification_repo, preference_repo.clone());
    let profile_service = ProfileService::new(profile_repo.clone());
    let channel_service = ChannelService::new(channel_repo.clone(), profile_repo.clone());
    let message_service = MessageService::new(
        message_repo.clone(),
        channel_repo,
        profile_repo.clone(),
        notification_service.clone(),
    );
    let thread_service = ThreadService::new(
        thread_repo,
        message_repo,
        profile_repo.clone(),
        notification_service.clone(),
    );
    let direct_message_service =
        DirectMessageService::new(dm_repo, profile_repo, notification_service.clone());
    let preference_service = PreferenceService::new(preference_repo);

    // Create app state
    let state = AppState {
        profile_service,
        channel_service,
        message_service,
        thread_service,
        direct_message_service,
        notification_service,
        preference_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
