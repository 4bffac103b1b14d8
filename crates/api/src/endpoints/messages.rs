//! Channel message endpoints, mounted under `/channels`.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, patch, post},
};
use chattr_common::AppResult;
use chattr_core::{SendMessageInput, UpdateMessageInput};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{middleware::AppState, response::ApiResponse};

/// Create message routes (merged into the channels router).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{channel_id}/messages", get(list_messages))
        .route("/{channel_id}/messages", post(send_message))
        .route("/{channel_id}/messages/{message_id}", patch(edit_message))
        .route("/{channel_id}/messages/{message_id}", delete(delete_message))
}

/// Message response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub content: String,
    pub channel_id: String,
    pub profile_id: String,
    pub has_thread: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<chattr_db::entities::message::Model> for MessageResponse {
    fn from(m: chattr_db::entities::message::Model) -> Self {
        let files = m
            .files
            .and_then(|v| serde_json::from_value::<Vec<String>>(v).ok());
        Self {
            id: m.id,
            content: m.content,
            channel_id: m.channel_id,
            profile_id: m.profile_id,
            has_thread: m.has_thread,
            files,
            client_token: m.client_token,
            created_at: m.created_at.into(),
            updated_at: m.updated_at.into(),
        }
    }
}

/// Message listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesListResponse {
    pub messages: Vec<MessageResponse>,
}

/// List messages query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesQuery {
    pub limit: Option<u64>,
    pub before: Option<String>,
}

/// List messages in a channel, oldest first.
async fn list_messages(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Query(query): Query<ListMessagesQuery>,
) -> AppResult<ApiResponse<MessagesListResponse>> {
    let messages = state
        .message_service
        .list(&channel_id, query.limit, query.before.as_deref())
        .await?;

    Ok(ApiResponse::ok(MessagesListResponse {
        messages: messages.into_iter().map(MessageResponse::from).collect(),
    }))
}

/// Send a message to a channel.
async fn send_message(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Json(input): Json<SendMessageInput>,
) -> AppResult<ApiResponse<MessageResponse>> {
    info!(channel = %channel_id, author = %input.profile_id, "Sending message");

    let message = state.message_service.send(&channel_id, input).await?;

    Ok(ApiResponse::ok(message.into()))
}

/// Edit a message.
async fn edit_message(
    State(state): State<AppState>,
    Path((channel_id, message_id)): Path<(String, String)>,
    Json(input): Json<UpdateMessageInput>,
) -> AppResult<ApiResponse<MessageResponse>> {
    let message = state
        .message_service
        .edit(&channel_id, &message_id, input)
        .await?;

    Ok(ApiResponse::ok(message.into()))
}

/// Delete a message.
async fn delete_message(
    State(state): State<AppState>,
    Path((channel_id, message_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<()>> {
    info!(channel = %channel_id, message = %message_id, "Deleting message");

    state.message_service.delete(&channel_id, &message_id).await?;

    Ok(ApiResponse::ok(()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_response_serialization() {
        let response = MessageResponse {
            id: "m1".to_string(),
            content: "hello".to_string(),
            channel_id: "ch1".to_string(),
            profile_id: "p1".to_string(),
            has_thread: false,
            files: None,
            client_token: Some("tok1".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"hasThread\":false"));
        assert!(json.contains("\"clientToken\":\"tok1\""));
        assert!(!json.contains("\"files\""));
    }

    #[test]
    fn test_message_response_parses_files() {
        let model = chattr_db::entities::message::Model {
            id: "m1".to_string(),
            content: "see attached".to_string(),
            channel_id: "ch1".to_string(),
            profile_id: "p1".to_string(),
            has_thread: false,
            files: Some(serde_json::json!(["a.png", "b.pdf"])),
            client_token: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };

        let response = MessageResponse::from(model);
        assert_eq!(response.files, Some(vec!["a.png".to_string(), "b.pdf".to_string()]));
    }
}
