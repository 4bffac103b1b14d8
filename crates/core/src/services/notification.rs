//! Notification service.
//!
//! Besides the feed CRUD surface, this service is the producer side of
//! notifications: message, mention, and reply events call the `notify_*`
//! helpers, which honor the recipient's preferences (global switch,
//! per-category toggle, muted channels) before writing anything.

use chattr_common::{AppError, AppResult, IdGenerator};
use chattr_db::{
    entities::{
        channel, direct_message, message,
        notification::{self, NotificationType},
        preference, profile, thread_message,
    },
    repositories::{NotificationRepository, PreferenceRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for manually creating a notification.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationInput {
    pub profile_id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    pub source_id: Option<String>,
    pub source_type: Option<String>,
    pub channel_id: Option<String>,
    pub message_id: Option<String>,
}

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    preference_repo: PreferenceRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(
        notification_repo: NotificationRepository,
        preference_repo: PreferenceRepository,
    ) -> Self {
        Self {
            notification_repo,
            preference_repo,
            id_gen: IdGenerator::new(),
        }
    }

    // ==================== Feed operations ====================

    /// Get notifications for a profile, newest first.
    pub async fn list(&self, profile_id: &str) -> AppResult<Vec<notification::Model>> {
        self.notification_repo.find_by_profile(profile_id).await
    }

    /// Count unread notifications for a profile.
    pub async fn unread_count(&self, profile_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(profile_id).await
    }

    /// Mark a notification as read.
    pub async fn mark_read(&self, id: &str) -> AppResult<()> {
        let notification = self
            .notification_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Notification not found: {id}")))?;

        if !notification.is_read {
            self.notification_repo.mark_as_read(id).await?;
        }
        Ok(())
    }

    /// Mark all notifications as read for a profile. Returns the count of
    /// rows changed.
    pub async fn mark_all_read(&self, profile_id: &str) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(profile_id).await
    }

    /// Create a notification from explicit fields.
    pub async fn create(&self, input: CreateNotificationInput) -> AppResult<notification::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.create_internal(
            &input.profile_id,
            input.notification_type,
            &input.title,
            &input.content,
            input.source_id.as_deref(),
            input.source_type.as_deref(),
            input.channel_id.as_deref(),
            input.message_id.as_deref(),
        )
        .await
    }

    /// Delete a notification.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        // Surface NotFound so callers can adjust unread counts correctly
        self.notification_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Notification not found: {id}")))?;

        self.notification_repo.delete(id).await
    }

    // ==================== Producers ====================

    /// Notify a profile it was mentioned in a channel message.
    pub async fn notify_mention(
        &self,
        recipient_id: &str,
        author: &profile::Model,
        message: &message::Model,
        channel: &channel::Model,
    ) -> AppResult<Option<notification::Model>> {
        // Don't notify yourself
        if recipient_id == author.id {
            return Ok(None);
        }

        if !self
            .allows(recipient_id, |p| p.notify_on_mention, Some(&channel.id))
            .await?
        {
            return Ok(None);
        }

        let title = format!("You were mentioned in #{}", channel.name);
        let content = format!("{}: {}", author.name, message.content);

        self.create_internal(
            recipient_id,
            NotificationType::Mention,
            &title,
            &content,
            Some(&message.id),
            Some("message"),
            Some(&channel.id),
            Some(&message.id),
        )
        .await
        .map(Some)
    }

    /// Notify a parent message's author of a new thread reply.
    pub async fn notify_reply(
        &self,
        recipient_id: &str,
        author: &profile::Model,
        reply: &thread_message::Model,
        parent: &message::Model,
    ) -> AppResult<Option<notification::Model>> {
        if recipient_id == author.id {
            return Ok(None);
        }

        if !self
            .allows(recipient_id, |p| p.notify_on_reply, Some(&parent.channel_id))
            .await?
        {
            return Ok(None);
        }

        let content = format!("{} replied to your thread", author.name);

        self.create_internal(
            recipient_id,
            NotificationType::Reply,
            "New reply to your message",
            &content,
            Some(&reply.id),
            Some("thread"),
            Some(&parent.channel_id),
            Some(&parent.id),
        )
        .await
        .map(Some)
    }

    /// Notify the receiver of a new direct message.
    pub async fn notify_direct_message(
        &self,
        recipient_id: &str,
        sender: &profile::Model,
        dm: &direct_message::Model,
    ) -> AppResult<Option<notification::Model>> {
        if recipient_id == sender.id {
            return Ok(None);
        }

        if !self
            .allows(recipient_id, |p| p.notify_on_message, None)
            .await?
        {
            return Ok(None);
        }

        let title = format!("New message from {}", sender.name);
        let content = format!("{}: {}", sender.name, dm.content);

        self.create_internal(
            recipient_id,
            NotificationType::Message,
            &title,
            &content,
            Some(&dm.id),
            Some("message"),
            None,
            None,
        )
        .await
        .map(Some)
    }

    /// Check the recipient's preferences. A missing preference row means
    /// defaults: everything enabled, nothing muted.
    async fn allows(
        &self,
        profile_id: &str,
        category: impl Fn(&preference::Model) -> bool,
        channel_id: Option<&str>,
    ) -> AppResult<bool> {
        let Some(prefs) = self.preference_repo.find_by_profile(profile_id).await? else {
            return Ok(true);
        };

        if !prefs.notifications_enabled || !category(&prefs) {
            return Ok(false);
        }

        if let Some(channel_id) = channel_id {
            let muted: Vec<String> =
                serde_json::from_value(prefs.muted_channels).unwrap_or_default();
            if muted.iter().any(|id| id == channel_id) {
                return Ok(false);
            }
        }

        Ok(true)
    }

    #[allow(clippy::too_many_arguments)]
    async fn create_internal(
        &self,
        profile_id: &str,
        notification_type: NotificationType,
        title: &str,
        content: &str,
        source_id: Option<&str>,
        source_type: Option<&str>,
        channel_id: Option<&str>,
        message_id: Option<&str>,
    ) -> AppResult<notification::Model> {
        let now = Utc::now();
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            profile_id: Set(profile_id.to_string()),
            notification_type: Set(notification_type),
            title: Set(title.to_string()),
            content: Set(content.to_string()),
            is_read: Set(false),
            source_id: Set(source_id.map(ToString::to_string)),
            source_type: Set(source_type.map(ToString::to_string)),
            channel_id: Set(channel_id.map(ToString::to_string)),
            message_id: Set(message_id.map(ToString::to_string)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        self.notification_repo.create(model).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;
    use std::sync::Arc;

    fn test_profile(id: &str, name: &str) -> profile::Model {
        profile::Model {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{id}@example.com"),
            image_url: "https://example.com/a.png".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn test_message(id: &str, channel_id: &str, content: &str) -> message::Model {
        message::Model {
            id: id.to_string(),
            content: content.to_string(),
            channel_id: channel_id.to_string(),
            profile_id: "p1".to_string(),
            has_thread: false,
            files: None,
            client_token: None,
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

    fn prefs_with(muted: serde_json::Value, notify_on_mention: bool) -> preference::Model {
        preference::Model {
            profile_id: "p2".to_string(),
            theme: "system".to_string(),
            notifications_enabled: true,
            notify_on_message: true,
            notify_on_mention,
            notify_on_reply: true,
            muted_channels: muted,
            compact_view: false,
            font_size: "medium".to_string(),
            time_format: "12h".to_string(),
            date_format: "MM/DD/YYYY".to_string(),
            timezone: "UTC".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> NotificationService {
        NotificationService::new(
            NotificationRepository::new(Arc::clone(&db)),
            PreferenceRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_notify_mention_skips_self() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let svc = service(db);

        let author = test_profile("p1", "John Doe");
        let result = svc
            .notify_mention(
                "p1",
                &author,
                &test_message("m1", "ch1", "hi @John"),
                &test_channel("ch1", "general"),
            )
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_notify_mention_respects_muted_channel() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // preference lookup: ch1 is muted
                .append_query_results([[prefs_with(json!(["ch1"]), true)]])
                .into_connection(),
        );
        let svc = service(db);

        let author = test_profile("p1", "John Doe");
        let result = svc
            .notify_mention(
                "p2",
                &author,
                &test_message("m1", "ch1", "hi @Jane"),
                &test_channel("ch1", "general"),
            )
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_notify_mention_respects_category_toggle() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[prefs_with(json!([]), false)]])
                .into_connection(),
        );
        let svc = service(db);

        let author = test_profile("p1", "John Doe");
        let result = svc
            .notify_mention(
                "p2",
                &author,
                &test_message("m1", "ch1", "hi @Jane"),
                &test_channel("ch1", "general"),
            )
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_notify_mention_defaults_when_no_prefs_row() {
        let created = notification::Model {
            id: "n1".to_string(),
            profile_id: "p2".to_string(),
            notification_type: NotificationType::Mention,
            title: "You were mentioned in #general".to_string(),
            content: "John Doe: hi @Jane".to_string(),
            is_read: false,
            source_id: Some("m1".to_string()),
            source_type: Some("message".to_string()),
            channel_id: Some("ch1".to_string()),
            message_id: Some("m1".to_string()),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // preference lookup: no row
                .append_query_results([Vec::<preference::Model>::new()])
                // insert returning
                .append_query_results([[created.clone()]])
                .into_connection(),
        );
        let svc = service(db);

        let author = test_profile("p1", "John Doe");
        let result = svc
            .notify_mention(
                "p2",
                &author,
                &test_message("m1", "ch1", "hi @Jane"),
                &test_channel("ch1", "general"),
            )
            .await
            .unwrap();

        let n = result.unwrap();
        assert_eq!(n.notification_type, NotificationType::Mention);
        assert_eq!(n.title, "You were mentioned in #general");
    }
}
