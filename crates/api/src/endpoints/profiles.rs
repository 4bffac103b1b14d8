//! Profile endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chattr_common::AppResult;
use chattr_core::CreateProfileInput;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::{middleware::AppState, response::ApiResponse};

/// Create profiles router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_profiles))
        .route("/", post(create_profile))
        .route("/{profile_id}", get(get_profile))
}

/// Profile response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<chattr_db::entities::profile::Model> for ProfileResponse {
    fn from(p: chattr_db::entities::profile::Model) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            image_url: p.image_url,
            created_at: p.created_at.into(),
            updated_at: p.updated_at.into(),
        }
    }
}

/// Profile listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilesListResponse {
    pub profiles: Vec<ProfileResponse>,
}

/// Single profile response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleProfileResponse {
    pub profile: ProfileResponse,
}

/// List all profiles.
async fn list_profiles(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ProfilesListResponse>> {
    let profiles = state.profile_service.list().await?;

    Ok(ApiResponse::ok(ProfilesListResponse {
        profiles: profiles.into_iter().map(ProfileResponse::from).collect(),
    }))
}

/// Get a single profile by ID.
async fn get_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> AppResult<ApiResponse<SingleProfileResponse>> {
    let profile = state.profile_service.get(&profile_id).await?;

    Ok(ApiResponse::ok(SingleProfileResponse {
        profile: profile.into(),
    }))
}

/// Create a new profile.
async fn create_profile(
    State(state): State<AppState>,
    Json(input): Json<CreateProfileInput>,
) -> AppResult<ApiResponse<SingleProfileResponse>> {
    info!(email = %input.email, "Creating profile");

    let profile = state.profile_service.create(input).await?;

    Ok(ApiResponse::ok(SingleProfileResponse {
        profile: profile.into(),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_response_serialization() {
        let response = ProfileResponse {
            id: "p1".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            image_url: "https://example.com/a.png".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"imageUrl\""));
        assert!(json.contains("\"john@example.com\""));
    }
}
