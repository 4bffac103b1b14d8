//! Preference endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use chattr_common::AppResult;
use chattr_core::{NotificationToggle, UpdatePreferencesInput};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{middleware::AppState, response::ApiResponse};

/// Create preferences router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{profile_id}", get(get_preferences))
        .route("/{profile_id}", patch(update_preferences))
        .route("/{profile_id}/toggle", post(toggle_setting))
        .route("/{profile_id}/muted-channels", post(toggle_muted_channel))
        .route("/{profile_id}/reset", post(reset_preferences))
}

/// Preference response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceResponse {
    pub profile_id: String,
    pub theme: String,
    pub notifications_enabled: bool,
    pub notify_on_message: bool,
    pub notify_on_mention: bool,
    pub notify_on_reply: bool,
    pub muted_channels: Vec<String>,
    pub compact_view: bool,
    pub font_size: String,
    pub time_format: String,
    pub date_format: String,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<chattr_db::entities::preference::Model> for PreferenceResponse {
    fn from(p: chattr_db::entities::preference::Model) -> Self {
        let muted_channels = serde_json::from_value(p.muted_channels).unwrap_or_default();
        Self {
            profile_id: p.profile_id,
            theme: p.theme,
            notifications_enabled: p.notifications_enabled,
            notify_on_message: p.notify_on_message,
            notify_on_mention: p.notify_on_mention,
            notify_on_reply: p.notify_on_reply,
            muted_channels,
            compact_view: p.compact_view,
            font_size: p.font_size,
            time_format: p.time_format,
            date_format: p.date_format,
            timezone: p.timezone,
            created_at: p.created_at.into(),
            updated_at: p.updated_at.into(),
        }
    }
}

/// Get preferences (creating defaults when absent).
async fn get_preferences(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> AppResult<ApiResponse<PreferenceResponse>> {
    let preferences = state.preference_service.get(&profile_id).await?;

    Ok(ApiResponse::ok(preferences.into()))
}

/// Merge a partial patch into the preferences.
async fn update_preferences(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(input): Json<UpdatePreferencesInput>,
) -> AppResult<ApiResponse<PreferenceResponse>> {
    let preferences = state.preference_service.update(&profile_id, input).await?;

    Ok(ApiResponse::ok(preferences.into()))
}

/// Toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub setting: NotificationToggle,
}

/// Flip one boolean notification setting.
async fn toggle_setting(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(req): Json<ToggleRequest>,
) -> AppResult<ApiResponse<PreferenceResponse>> {
    let preferences = state
        .preference_service
        .toggle(&profile_id, req.setting)
        .await?;

    Ok(ApiResponse::ok(preferences.into()))
}

/// Muted channel toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleMutedChannelRequest {
    pub channel_id: String,
}

/// Add or remove a channel from the muted list.
async fn toggle_muted_channel(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(req): Json<ToggleMutedChannelRequest>,
) -> AppResult<ApiResponse<PreferenceResponse>> {
    let preferences = state
        .preference_service
        .toggle_muted_channel(&profile_id, &req.channel_id)
        .await?;

    Ok(ApiResponse::ok(preferences.into()))
}

/// Overwrite the preferences with defaults.
async fn reset_preferences(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> AppResult<ApiResponse<PreferenceResponse>> {
    let preferences = state.preference_service.reset(&profile_id).await?;

    Ok(ApiResponse::ok(preferences.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_response_serialization() {
        let response = PreferenceResponse {
            profile_id: "p1".to_string(),
            theme: "dark".to_string(),
            notifications_enabled: true,
            notify_on_message: true,
            notify_on_mention: true,
            notify_on_reply: false,
            muted_channels: vec!["ch1".to_string()],
            compact_view: false,
            font_size: "medium".to_string(),
            time_format: "12h".to_string(),
            date_format: "MM/DD/YYYY".to_string(),
            timezone: "UTC".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"notifyOnReply\":false"));
        assert!(json.contains("\"mutedChannels\":[\"ch1\"]"));
    }

    #[test]
    fn test_toggle_request_deserialization() {
        let req: ToggleRequest =
            serde_json::from_str(r#"{"setting":"notifyOnMention"}"#).unwrap();
        assert_eq!(req.setting, NotificationToggle::NotifyOnMention);
    }
}
