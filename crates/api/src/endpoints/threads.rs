//! Thread endpoints, mounted under `/messages`.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, patch, post},
};
use chattr_common::AppResult;
use chattr_core::SendThreadMessageInput;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::endpoints::messages::MessageResponse;
use crate::{middleware::AppState, response::ApiResponse};

/// Create thread routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{message_id}/thread", get(get_thread))
        .route("/{message_id}/thread", post(send_reply))
        .route("/{message_id}/thread/{reply_id}", patch(edit_reply))
        .route("/{message_id}/thread/{reply_id}", delete(delete_reply))
}

/// Thread reply response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadMessageResponse {
    pub id: String,
    pub content: String,
    pub message_id: String,
    pub profile_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<chattr_db::entities::thread_message::Model> for ThreadMessageResponse {
    fn from(t: chattr_db::entities::thread_message::Model) -> Self {
        let files = t
            .files
            .and_then(|v| serde_json::from_value::<Vec<String>>(v).ok());
        Self {
            id: t.id,
            content: t.content,
            message_id: t.message_id,
            profile_id: t.profile_id,
            files,
            created_at: t.created_at.into(),
            updated_at: t.updated_at.into(),
        }
    }
}

/// Thread response: the parent message plus its replies, oldest first.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadResponse {
    pub parent: MessageResponse,
    pub replies: Vec<ThreadMessageResponse>,
}

/// Get a thread (parent message and replies).
async fn get_thread(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
) -> AppResult<ApiResponse<ThreadResponse>> {
    let parent = state.thread_service.parent(&message_id).await?;
    let replies = state.thread_service.replies(&message_id).await?;

    Ok(ApiResponse::ok(ThreadResponse {
        parent: parent.into(),
        replies: replies.into_iter().map(ThreadMessageResponse::from).collect(),
    }))
}

/// Send a reply in a thread.
async fn send_reply(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
    Json(input): Json<SendThreadMessageInput>,
) -> AppResult<ApiResponse<ThreadMessageResponse>> {
    info!(parent = %message_id, author = %input.profile_id, "Sending thread reply");

    let reply = state.thread_service.reply(&message_id, input).await?;

    Ok(ApiResponse::ok(reply.into()))
}

/// Edit reply request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditReplyRequest {
    pub content: String,
}

/// Edit a thread reply.
async fn edit_reply(
    State(state): State<AppState>,
    Path((message_id, reply_id)): Path<(String, String)>,
    Json(req): Json<EditReplyRequest>,
) -> AppResult<ApiResponse<ThreadMessageResponse>> {
    let reply = state
        .thread_service
        .edit(&message_id, &reply_id, req.content)
        .await?;

    Ok(ApiResponse::ok(reply.into()))
}

/// Delete a thread reply.
async fn delete_reply(
    State(state): State<AppState>,
    Path((message_id, reply_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<()>> {
    info!(parent = %message_id, reply = %reply_id, "Deleting thread reply");

    state.thread_service.delete(&message_id, &reply_id).await?;

    Ok(ApiResponse::ok(()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_message_response_serialization() {
        let response = ThreadMessageResponse {
            id: "t1".to_string(),
            content: "a reply".to_string(),
            message_id: "m1".to_string(),
            profile_id: "p1".to_string(),
            files: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"messageId\":\"m1\""));
    }
}
