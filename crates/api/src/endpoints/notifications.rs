//! Notification endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chattr_common::AppResult;
use chattr_core::CreateNotificationInput;
use chattr_db::entities::notification::{Model as NotificationModel, NotificationType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{middleware::AppState, response::ApiResponse};

/// Create notifications router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_notification))
        .route("/read", post(mark_as_read))
        .route("/delete", post(delete_notification))
        .route("/{profile_id}", get(get_notifications))
        .route("/{profile_id}/unread-count", get(unread_count))
        .route("/{profile_id}/read-all", post(mark_all_as_read))
}

fn notification_type_to_string(t: &NotificationType) -> String {
    match t {
        NotificationType::Message => "message".to_string(),
        NotificationType::Mention => "mention".to_string(),
        NotificationType::Reply => "reply".to_string(),
    }
}

/// Notification response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub profile_id: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub content: String,
    pub is_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationModel> for NotificationResponse {
    fn from(n: NotificationModel) -> Self {
        Self {
            id: n.id,
            profile_id: n.profile_id,
            notification_type: notification_type_to_string(&n.notification_type),
            title: n.title,
            content: n.content,
            is_read: n.is_read,
            source_id: n.source_id,
            source_type: n.source_type,
            channel_id: n.channel_id,
            message_id: n.message_id,
            created_at: n.created_at.into(),
        }
    }
}

/// Notification listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsListResponse {
    pub notifications: Vec<NotificationResponse>,
}

/// Get notifications for a profile, newest first.
async fn get_notifications(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> AppResult<ApiResponse<NotificationsListResponse>> {
    let notifications = state.notification_service.list(&profile_id).await?;

    Ok(ApiResponse::ok(NotificationsListResponse {
        notifications: notifications.into_iter().map(Into::into).collect(),
    }))
}

/// Unread count response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub count: u64,
}

/// Get unread notification count.
async fn unread_count(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> AppResult<ApiResponse<UnreadCountResponse>> {
    let count = state.notification_service.unread_count(&profile_id).await?;

    Ok(ApiResponse::ok(UnreadCountResponse { count }))
}

/// Create a notification from explicit fields.
async fn create_notification(
    State(state): State<AppState>,
    Json(input): Json<CreateNotificationInput>,
) -> AppResult<ApiResponse<NotificationResponse>> {
    let notification = state.notification_service.create(input).await?;

    Ok(ApiResponse::ok(notification.into()))
}

/// Mark notification as read request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAsReadRequest {
    pub notification_id: String,
}

/// Mark a notification as read.
async fn mark_as_read(
    State(state): State<AppState>,
    Json(req): Json<MarkAsReadRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .notification_service
        .mark_read(&req.notification_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// Mark all as read response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllAsReadResponse {
    pub count: u64,
}

/// Mark all notifications as read for a profile.
async fn mark_all_as_read(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> AppResult<ApiResponse<MarkAllAsReadResponse>> {
    let count = state.notification_service.mark_all_read(&profile_id).await?;

    Ok(ApiResponse::ok(MarkAllAsReadResponse { count }))
}

/// Delete notification request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNotificationRequest {
    pub notification_id: String,
}

/// Delete a notification.
async fn delete_notification(
    State(state): State<AppState>,
    Json(req): Json<DeleteNotificationRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .notification_service
        .delete(&req.notification_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_response_serialization() {
        let response = NotificationResponse {
            id: "n1".to_string(),
            profile_id: "p1".to_string(),
            notification_type: "mention".to_string(),
            title: "You were mentioned in #design".to_string(),
            content: "Jane Smith: @John can you check the new design?".to_string(),
            is_read: false,
            source_id: None,
            source_type: None,
            channel_id: Some("ch2".to_string()),
            message_id: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"type\":\"mention\""));
        assert!(json.contains("\"isRead\":false"));
        assert!(!json.contains("\"sourceId\""));
    }
}
