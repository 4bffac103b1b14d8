//! Profile service.

use chattr_common::{AppError, AppResult, IdGenerator};
use chattr_db::{entities::profile, repositories::ProfileRepository};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a profile.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 512))]
    pub image_url: String,
}

/// Profile service.
#[derive(Clone)]
pub struct ProfileService {
    profile_repo: ProfileRepository,
    id_gen: IdGenerator,
}

impl ProfileService {
    /// Create a new profile service.
    #[must_use]
    pub const fn new(profile_repo: ProfileRepository) -> Self {
        Self {
            profile_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a profile by ID.
    pub async fn get(&self, id: &str) -> AppResult<profile::Model> {
        self.profile_repo.get_by_id(id).await
    }

    /// List all profiles, newest first.
    pub async fn list(&self) -> AppResult<Vec<profile::Model>> {
        self.profile_repo.list().await
    }

    /// Create a new profile.
    pub async fn create(&self, input: CreateProfileInput) -> AppResult<profile::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // Email addresses are unique
        if self.profile_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Email already registered: {}",
                input.email
            )));
        }

        let now = Utc::now();
        let model = profile::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            email: Set(input.email),
            image_url: Set(input.image_url),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        self.profile_repo.create(model).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_profile(id: &str, email: &str) -> profile::Model {
        profile::Model {
            id: id.to_string(),
            name: "John Doe".to_string(),
            email: email.to_string(),
            image_url: "https://example.com/a.png".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_profile("p1", "john@example.com")]])
                .into_connection(),
        );

        let service = ProfileService::new(ProfileRepository::new(db));
        let profile = service.get("p1").await.unwrap();

        assert_eq!(profile.email, "john@example.com");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_profile("p1", "john@example.com")]])
                .into_connection(),
        );

        let service = ProfileService::new(ProfileRepository::new(db));
        let result = service
            .create(CreateProfileInput {
                name: "Someone Else".to_string(),
                email: "john@example.com".to_string(),
                image_url: "https://example.com/b.png".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let service = ProfileService::new(ProfileRepository::new(db));
        let result = service
            .create(CreateProfileInput {
                name: "John".to_string(),
                email: "not-an-email".to_string(),
                image_url: "https://example.com/a.png".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
