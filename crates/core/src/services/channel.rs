//! Channel service.

use chattr_common::{AppError, AppResult, IdGenerator};
use chattr_db::entities::channel;
use chattr_db::repositories::{ChannelRepository, ProfileRepository};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a channel.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateChannelInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(max = 2048))]
    pub description: Option<String>,
    pub created_by_id: String,
    #[serde(default)]
    pub is_private: bool,
}

/// Input for updating a channel.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChannelInput {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(length(max = 2048))]
    pub description: Option<Option<String>>,
    pub is_private: Option<bool>,
}

/// Service for managing channels.
#[derive(Clone)]
pub struct ChannelService {
    channel_repo: ChannelRepository,
    profile_repo: ProfileRepository,
    id_gen: IdGenerator,
}

impl ChannelService {
    /// Create a new channel service.
    #[must_use]
    pub const fn new(channel_repo: ChannelRepository, profile_repo: ProfileRepository) -> Self {
        Self {
            channel_repo,
            profile_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a channel by ID.
    pub async fn get(&self, id: &str) -> AppResult<channel::Model> {
        self.channel_repo.get_by_id(id).await
    }

    /// List all channels, newest first.
    pub async fn list(&self) -> AppResult<Vec<channel::Model>> {
        self.channel_repo.list().await
    }

    /// Create a new channel.
    pub async fn create(&self, input: CreateChannelInput) -> AppResult<channel::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // Creator must exist
        self.profile_repo.get_by_id(&input.created_by_id).await?;

        // Channel names are unique, case-insensitively
        if self.channel_repo.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Channel name already taken: {}",
                input.name
            )));
        }

        let now = Utc::now();
        let model = channel::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            description: Set(input.description),
            created_by_id: Set(input.created_by_id),
            is_private: Set(input.is_private),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let channel = self.channel_repo.create(model).await?;
        tracing::info!(channel = %channel.id, name = %channel.name, "Channel created");

        Ok(channel)
    }

    /// Update a channel.
    pub async fn update(&self, id: &str, input: UpdateChannelInput) -> AppResult<channel::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let channel = self.channel_repo.get_by_id(id).await?;

        if let Some(ref name) = input.name
            && !name.eq_ignore_ascii_case(&channel.name)
            && self.channel_repo.find_by_name(name).await?.is_some()
        {
            return Err(AppError::Conflict(format!(
                "Channel name already taken: {name}"
            )));
        }

        let mut active: channel::ActiveModel = channel.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(is_private) = input.is_private {
            active.is_private = Set(is_private);
        }

        active.updated_at = Set(Utc::now().into());

        self.channel_repo.update(active).await
    }

    /// Delete a channel permanently. Messages and their thread replies are
    /// removed by the cascading foreign keys.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        // Surface NotFound before issuing the delete
        self.channel_repo.get_by_id(id).await?;
        self.channel_repo.delete(id).await?;
        tracing::info!(channel = %id, "Channel deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chattr_db::entities::profile;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_profile(id: &str) -> profile::Model {
        profile::Model {
            id: id.to_string(),
            name: "John Doe".to_string(),
            email: format!("{id}@example.com"),
            image_url: "https://example.com/a.png".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn test_channel(id: &str, name: &str) -> channel::Model {
        channel::Model {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            created_by_id: "p1".to_string(),
            is_private: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // creator lookup
                .append_query_results([[test_profile("p1")]])
                // name collision lookup
                .append_query_results([[test_channel("ch1", "general")]])
                .into_connection(),
        );

        let service = ChannelService::new(
            ChannelRepository::new(Arc::clone(&db)),
            ProfileRepository::new(db),
        );

        let result = service
            .create(CreateChannelInput {
                name: "General".to_string(),
                description: None,
                created_by_id: "p1".to_string(),
                is_private: false,
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_requires_existing_creator() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<profile::Model>::new()])
                .into_connection(),
        );

        let service = ChannelService::new(
            ChannelRepository::new(Arc::clone(&db)),
            ProfileRepository::new(db),
        );

        let result = service
            .create(CreateChannelInput {
                name: "general".to_string(),
                description: None,
                created_by_id: "ghost".to_string(),
                is_private: false,
            })
            .await;

        assert!(matches!(result, Err(AppError::ProfileNotFound(_))));
    }

    #[tokio::test]
    async fn test_get() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_channel("ch1", "general")]])
                .into_connection(),
        );

        let service = ChannelService::new(
            ChannelRepository::new(Arc::clone(&db)),
            ProfileRepository::new(db),
        );

        let channel = service.get("ch1").await.unwrap();
        assert_eq!(channel.name, "general");
    }
}
