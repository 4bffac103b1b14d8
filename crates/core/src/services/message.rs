//! Message service for channel messages.

use crate::mention::extract_mentions;
use crate::services::notification::NotificationService;
use chattr_common::{AppError, AppResult, IdGenerator};
use chattr_db::{
    entities::message,
    repositories::{ChannelRepository, MessageRepository, ProfileRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for sending a message to a channel.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageInput {
    #[validate(length(min = 1, max = 8192))]
    pub content: String,
    pub profile_id: String,
    #[serde(default)]
    pub files: Vec<String>,
    /// Client correlation token: echoed back on the record and used to
    /// make the send idempotent.
    pub client_token: Option<String>,
}

/// Input for editing a message.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessageInput {
    #[validate(length(min = 1, max = 8192))]
    pub content: String,
}

/// Message service.
#[derive(Clone)]
pub struct MessageService {
    message_repo: MessageRepository,
    channel_repo: ChannelRepository,
    profile_repo: ProfileRepository,
    notification_service: NotificationService,
    id_gen: IdGenerator,
}

impl MessageService {
    /// Create a new message service.
    #[must_use]
    pub const fn new(
        message_repo: MessageRepository,
        channel_repo: ChannelRepository,
        profile_repo: ProfileRepository,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            message_repo,
            channel_repo,
            profile_repo,
            notification_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get messages for a channel, sorted by `created_at` ascending.
    pub async fn list(
        &self,
        channel_id: &str,
        limit: Option<u64>,
        before: Option<&str>,
    ) -> AppResult<Vec<message::Model>> {
        // Surface NotFound for unknown channels instead of an empty list
        self.channel_repo.get_by_id(channel_id).await?;
        self.message_repo.find_by_channel(channel_id, limit, before).await
    }

    /// Get a single message.
    pub async fn get(&self, id: &str) -> AppResult<message::Model> {
        self.message_repo.get_by_id(id).await
    }

    /// Send a message to a channel.
    ///
    /// When the input carries a client token and a message with that
    /// token already exists, the stored record is returned as-is: resends
    /// after a lost response do not duplicate the message.
    pub async fn send(&self, channel_id: &str, input: SendMessageInput) -> AppResult<message::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let channel = self.channel_repo.get_by_id(channel_id).await?;
        let author = self.profile_repo.get_by_id(&input.profile_id).await?;

        if let Some(ref token) = input.client_token
            && let Some(existing) = self.message_repo.find_by_client_token(token).await?
        {
            return Ok(existing);
        }

        let now = Utc::now();
        let files = if input.files.is_empty() {
            None
        } else {
            Some(serde_json::json!(input.files))
        };

        let model = message::ActiveModel {
            id: Set(self.id_gen.generate()),
            content: Set(input.content),
            channel_id: Set(channel.id.clone()),
            profile_id: Set(author.id.clone()),
            has_thread: Set(false),
            files: Set(files),
            client_token: Set(input.client_token),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let message = self.message_repo.create(model).await?;

        tracing::info!(
            message = %message.id,
            channel = %channel.id,
            author = %author.id,
            "Message sent"
        );

        // Fan out mention notifications; a failed notification must not
        // fail the send.
        for name in extract_mentions(&message.content) {
            match self.profile_repo.find_by_name(&name).await {
                Ok(Some(mentioned)) => {
                    if let Err(e) = self
                        .notification_service
                        .notify_mention(&mentioned.id, &author, &message, &channel)
                        .await
                    {
                        tracing::warn!(error = %e, mentioned = %mentioned.id, "Failed to create mention notification");
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, name = %name, "Mention lookup failed");
                }
            }
        }

        Ok(message)
    }

    /// Edit a message's content.
    pub async fn edit(
        &self,
        channel_id: &str,
        message_id: &str,
        input: UpdateMessageInput,
    ) -> AppResult<message::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let message = self.message_repo.get_by_id(message_id).await?;

        if message.channel_id != channel_id {
            return Err(AppError::BadRequest(
                "Message does not belong to this channel".to_string(),
            ));
        }

        let mut active: message::ActiveModel = message.into();
        active.content = Set(input.content);
        active.updated_at = Set(Utc::now().into());

        self.message_repo.update(active).await
    }

    /// Delete a message.
    pub async fn delete(&self, channel_id: &str, message_id: &str) -> AppResult<()> {
        let message = self.message_repo.get_by_id(message_id).await?;

        if message.channel_id != channel_id {
            return Err(AppError::BadRequest(
                "Message does not belong to this channel".to_string(),
            ));
        }

        self.message_repo.delete(message_id).await
    }
}
