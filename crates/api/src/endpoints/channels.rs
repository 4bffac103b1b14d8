//! Channel endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, patch, post},
};
use chattr_common::AppResult;
use chattr_core::{CreateChannelInput, UpdateChannelInput};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::{middleware::AppState, response::ApiResponse};

/// Create channels router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_channels))
        .route("/", post(create_channel))
        .route("/{channel_id}", get(get_channel))
        .route("/{channel_id}", patch(update_channel))
        .route("/{channel_id}", delete(delete_channel))
}

/// Channel response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_by_id: String,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<chattr_db::entities::channel::Model> for ChannelResponse {
    fn from(c: chattr_db::entities::channel::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            created_by_id: c.created_by_id,
            is_private: c.is_private,
            created_at: c.created_at.into(),
            updated_at: c.updated_at.into(),
        }
    }
}

/// Channel listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsListResponse {
    pub channels: Vec<ChannelResponse>,
}

/// List all channels, newest first.
async fn list_channels(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ChannelsListResponse>> {
    let channels = state.channel_service.list().await?;

    Ok(ApiResponse::ok(ChannelsListResponse {
        channels: channels.into_iter().map(ChannelResponse::from).collect(),
    }))
}

/// Get a channel by ID.
async fn get_channel(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> AppResult<ApiResponse<ChannelResponse>> {
    let channel = state.channel_service.get(&channel_id).await?;

    Ok(ApiResponse::ok(channel.into()))
}

/// Create a new channel.
async fn create_channel(
    State(state): State<AppState>,
    Json(input): Json<CreateChannelInput>,
) -> AppResult<ApiResponse<ChannelResponse>> {
    info!(name = %input.name, creator = %input.created_by_id, "Creating channel");

    let channel = state.channel_service.create(input).await?;

    Ok(ApiResponse::ok(channel.into()))
}

/// Update a channel.
async fn update_channel(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Json(input): Json<UpdateChannelInput>,
) -> AppResult<ApiResponse<ChannelResponse>> {
    let channel = state.channel_service.update(&channel_id, input).await?;

    Ok(ApiResponse::ok(channel.into()))
}

/// Delete a channel.
async fn delete_channel(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    info!(channel = %channel_id, "Deleting channel");

    state.channel_service.delete(&channel_id).await?;

    Ok(ApiResponse::ok(()))
}
