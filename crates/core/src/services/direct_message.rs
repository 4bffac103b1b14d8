//! Direct message service.

use crate::services::notification::NotificationService;
use chattr_common::{AppError, AppResult, IdGenerator};
use chattr_db::{
    entities::direct_message,
    repositories::{DirectMessageRepository, ProfileRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for sending a direct message.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendDirectMessageInput {
    #[validate(length(min = 1, max = 8192))]
    pub content: String,
    /// Client correlation token: echoed back on the record and used to
    /// make the send idempotent.
    pub client_token: Option<String>,
}

/// Conversation summary for listing.
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub partner_id: String,
    pub partner_name: String,
    pub partner_email: String,
    pub partner_image_url: String,
    pub last_message: Option<direct_message::Model>,
    pub unread_count: u64,
}

/// Direct message service.
#[derive(Clone)]
pub struct DirectMessageService {
    dm_repo: DirectMessageRepository,
    profile_repo: ProfileRepository,
    notification_service: NotificationService,
    id_gen: IdGenerator,
}

impl DirectMessageService {
    /// Create a new direct message service.
    #[must_use]
    pub const fn new(
        dm_repo: DirectMessageRepository,
        profile_repo: ProfileRepository,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            dm_repo,
            profile_repo,
            notification_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// List conversations for a profile, most recently active first.
    ///
    /// A conversation is the derived grouping of direct messages with one
    /// partner; nothing is stored per conversation.
    pub async fn conversations(&self, profile_id: &str) -> AppResult<Vec<ConversationSummary>> {
        self.profile_repo.get_by_id(profile_id).await?;

        let partner_ids = self.dm_repo.find_conversation_partners(profile_id).await?;

        let mut summaries = Vec::new();

        for partner_id in partner_ids {
            if let Some(partner) = self.profile_repo.find_by_id(&partner_id).await? {
                let last_message = self
                    .dm_repo
                    .find_latest_in_conversation(profile_id, &partner_id)
                    .await?;

                let unread_count = self.dm_repo.count_unread_from(profile_id, &partner_id).await?;

                summaries.push(ConversationSummary {
                    partner_id: partner.id,
                    partner_name: partner.name,
                    partner_email: partner.email,
                    partner_image_url: partner.image_url,
                    last_message,
                    unread_count,
                });
            }
        }

        // Most recent conversation first; partners without any message sort last
        summaries.sort_by(|a, b| {
            let a_at = a.last_message.as_ref().map(|m| m.created_at);
            let b_at = b.last_message.as_ref().map(|m| m.created_at);
            b_at.cmp(&a_at)
        });

        Ok(summaries)
    }

    /// Get messages between two profiles, sorted by `created_at`
    /// ascending. Reading does not mark anything as read; that is the
    /// explicit [`Self::mark_read`] call.
    pub async fn history(
        &self,
        profile_id: &str,
        partner_id: &str,
    ) -> AppResult<Vec<direct_message::Model>> {
        self.profile_repo.get_by_id(partner_id).await?;
        self.dm_repo.find_conversation(profile_id, partner_id).await
    }

    /// Send a direct message.
    pub async fn send(
        &self,
        sender_id: &str,
        receiver_id: &str,
        input: SendDirectMessageInput,
    ) -> AppResult<direct_message::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if sender_id == receiver_id {
            return Err(AppError::BadRequest(
                "Cannot send message to yourself".to_string(),
            ));
        }

        let sender = self.profile_repo.get_by_id(sender_id).await?;
        self.profile_repo.get_by_id(receiver_id).await?;

        if let Some(ref token) = input.client_token
            && let Some(existing) = self.dm_repo.find_by_client_token(token).await?
        {
            return Ok(existing);
        }

        let now = Utc::now();
        let model = direct_message::ActiveModel {
            id: Set(self.id_gen.generate()),
            content: Set(input.content),
            sender_id: Set(sender.id.clone()),
            receiver_id: Set(receiver_id.to_string()),
            is_read: Set(false),
            client_token: Set(input.client_token),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let message = self.dm_repo.create(model).await?;

        tracing::info!(
            message = %message.id,
            sender = %sender.id,
            receiver = %receiver_id,
            "Direct message sent"
        );

        // Notify the receiver; a failed notification must not fail the send.
        if let Err(e) = self
            .notification_service
            .notify_direct_message(receiver_id, &sender, &message)
            .await
        {
            tracing::warn!(error = %e, "Failed to create direct message notification");
        }

        Ok(message)
    }

    /// Mark all unread messages from `sender_id` to `reader_id` as read.
    /// Returns the number of messages marked.
    pub async fn mark_read(&self, reader_id: &str, sender_id: &str) -> AppResult<u64> {
        self.dm_repo.mark_as_read(reader_id, sender_id).await
    }
}
