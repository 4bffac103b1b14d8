//! Direct message endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chattr_common::AppResult;
use chattr_core::SendDirectMessageInput;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::{middleware::AppState, response::ApiResponse};

/// Create direct message router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{profile_id}", get(list_conversations))
        .route("/{profile_id}/with/{partner_id}", get(get_history))
        .route("/{profile_id}/with/{partner_id}", post(send_message))
        .route("/{profile_id}/with/{partner_id}/read", post(mark_as_read))
}

/// Direct message response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessageResponse {
    pub id: String,
    pub content: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub is_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<chattr_db::entities::direct_message::Model> for DirectMessageResponse {
    fn from(m: chattr_db::entities::direct_message::Model) -> Self {
        Self {
            id: m.id,
            content: m.content,
            sender_id: m.sender_id,
            receiver_id: m.receiver_id,
            is_read: m.is_read,
            client_token: m.client_token,
            created_at: m.created_at.into(),
            updated_at: m.updated_at.into(),
        }
    }
}

/// Conversation summary response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub partner_id: String,
    pub partner_name: String,
    pub partner_email: String,
    pub partner_image_url: String,
    pub last_message: Option<DirectMessageResponse>,
    pub unread_count: u64,
}

/// Conversation listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationsListResponse {
    pub conversations: Vec<ConversationResponse>,
}

/// List conversations for a profile.
async fn list_conversations(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> AppResult<ApiResponse<ConversationsListResponse>> {
    let summaries = state.direct_message_service.conversations(&profile_id).await?;

    let conversations = summaries
        .into_iter()
        .map(|s| ConversationResponse {
            partner_id: s.partner_id,
            partner_name: s.partner_name,
            partner_email: s.partner_email,
            partner_image_url: s.partner_image_url,
            last_message: s.last_message.map(DirectMessageResponse::from),
            unread_count: s.unread_count,
        })
        .collect();

    Ok(ApiResponse::ok(ConversationsListResponse { conversations }))
}

/// Message listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessagesListResponse {
    pub messages: Vec<DirectMessageResponse>,
}

/// Get messages with a partner, oldest first.
async fn get_history(
    State(state): State<AppState>,
    Path((profile_id, partner_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<DirectMessagesListResponse>> {
    let messages = state
        .direct_message_service
        .history(&profile_id, &partner_id)
        .await?;

    Ok(ApiResponse::ok(DirectMessagesListResponse {
        messages: messages.into_iter().map(DirectMessageResponse::from).collect(),
    }))
}

/// Send a direct message.
async fn send_message(
    State(state): State<AppState>,
    Path((profile_id, partner_id)): Path<(String, String)>,
    Json(input): Json<SendDirectMessageInput>,
) -> AppResult<ApiResponse<DirectMessageResponse>> {
    info!(sender = %profile_id, receiver = %partner_id, "Sending direct message");

    let message = state
        .direct_message_service
        .send(&profile_id, &partner_id, input)
        .await?;

    Ok(ApiResponse::ok(message.into()))
}

/// Mark as read response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAsReadResponse {
    pub read_count: u64,
}

/// Mark messages from a partner as read.
async fn mark_as_read(
    State(state): State<AppState>,
    Path((profile_id, partner_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<MarkAsReadResponse>> {
    info!(reader = %profile_id, sender = %partner_id, "Marking messages as read");

    let count = state
        .direct_message_service
        .mark_read(&profile_id, &partner_id)
        .await?;

    Ok(ApiResponse::ok(MarkAsReadResponse { read_count: count }))
}
