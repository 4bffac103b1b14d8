//! Thread service for reply sub-streams.

use crate::services::notification::NotificationService;
use chattr_common::{AppError, AppResult, IdGenerator};
use chattr_db::{
    entities::{message, thread_message},
    repositories::{MessageRepository, ProfileRepository, ThreadMessageRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for sending a thread reply.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendThreadMessageInput {
    #[validate(length(min = 1, max = 8192))]
    pub content: String,
    pub profile_id: String,
    #[serde(default)]
    pub files: Vec<String>,
}

/// Thread service.
#[derive(Clone)]
pub struct ThreadService {
    thread_repo: ThreadMessageRepository,
    message_repo: MessageRepository,
    profile_repo: ProfileRepository,
    notification_service: NotificationService,
    id_gen: IdGenerator,
}

impl ThreadService {
    /// Create a new thread service.
    #[must_use]
    pub const fn new(
        thread_repo: ThreadMessageRepository,
        message_repo: MessageRepository,
        profile_repo: ProfileRepository,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            thread_repo,
            message_repo,
            profile_repo,
            notification_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get the parent message of a thread.
    pub async fn parent(&self, message_id: &str) -> AppResult<message::Model> {
        self.message_repo.get_by_id(message_id).await
    }

    /// Get replies for a parent message, oldest first.
    pub async fn replies(&self, message_id: &str) -> AppResult<Vec<thread_message::Model>> {
        // Surface NotFound for unknown parents instead of an empty list
        self.message_repo.get_by_id(message_id).await?;
        self.thread_repo.find_by_parent(message_id).await
    }

    /// Send a reply in a thread.
    ///
    /// The reply insert and the parent's `has_thread` flag update happen
    /// in one transaction.
    pub async fn reply(
        &self,
        message_id: &str,
        input: SendThreadMessageInput,
    ) -> AppResult<thread_message::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let parent = self.message_repo.get_by_id(message_id).await?;
        let author = self.profile_repo.get_by_id(&input.profile_id).await?;

        let now = Utc::now();
        let files = if input.files.is_empty() {
            None
        } else {
            Some(serde_json::json!(input.files))
        };

        let model = thread_message::ActiveModel {
            id: Set(self.id_gen.generate()),
            content: Set(input.content),
            message_id: Set(parent.id.clone()),
            profile_id: Set(author.id.clone()),
            files: Set(files),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let reply = self.thread_repo.create(model).await?;

        tracing::info!(
            reply = %reply.id,
            parent = %parent.id,
            author = %author.id,
            "Thread reply sent"
        );

        // Notify the parent author; a failed notification must not fail
        // the reply.
        if let Err(e) = self
            .notification_service
            .notify_reply(&parent.profile_id, &author, &reply, &parent)
            .await
        {
            tracing::warn!(error = %e, "Failed to create reply notification");
        }

        Ok(reply)
    }

    /// Edit a reply's content.
    pub async fn edit(
        &self,
        message_id: &str,
        reply_id: &str,
        content: String,
    ) -> AppResult<thread_message::Model> {
        if content.trim().is_empty() {
            return Err(AppError::Validation("Reply content is empty".to_string()));
        }

        let reply = self.thread_repo.get_by_id(reply_id).await?;

        if reply.message_id != message_id {
            return Err(AppError::BadRequest(
                "Reply does not belong to this thread".to_string(),
            ));
        }

        let mut active: thread_message::ActiveModel = reply.into();
        active.content = Set(content);
        active.updated_at = Set(Utc::now().into());

        self.thread_repo.update(active).await
    }

    /// Delete a reply. When it was the last reply, the parent's
    /// `has_thread` flag is cleared in the same transaction.
    pub async fn delete(&self, message_id: &str, reply_id: &str) -> AppResult<()> {
        let reply = self.thread_repo.get_by_id(reply_id).await?;

        if reply.message_id != message_id {
            return Err(AppError::BadRequest(
                "Reply does not belong to this thread".to_string(),
            ));
        }

        self.thread_repo.delete(reply_id, message_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_reply(id: &str, message_id: &str) -> thread_message::Model {
        thread_message::Model {
            id: id.to_string(),
            content: "a reply".to_string(),
            message_id: message_id.to_string(),
            profile_id: "p1".to_string(),
            files: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> ThreadService {
        use chattr_db::repositories::{NotificationRepository, PreferenceRepository};

        let notifications = NotificationService::new(
            NotificationRepository::new(Arc::clone(&db)),
            PreferenceRepository::new(Arc::clone(&db)),
        );
        ThreadService::new(
            ThreadMessageRepository::new(Arc::clone(&db)),
            MessageRepository::new(Arc::clone(&db)),
            ProfileRepository::new(db),
            notifications,
        )
    }

    #[tokio::test]
    async fn test_reply_requires_existing_parent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<message::Model>::new()])
                .into_connection(),
        );

        let svc = service(db);
        let result = svc
            .reply(
                "missing",
                SendThreadMessageInput {
                    content: "a reply".to_string(),
                    profile_id: "p1".to_string(),
                    files: vec![],
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::MessageNotFound(_))));
    }

    #[tokio::test]
    async fn test_edit_checks_thread() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_reply("t1", "m1")]])
                .into_connection(),
        );

        let svc = service(db);
        let result = svc.edit("other-thread", "t1", "edited".to_string()).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_edit_rejects_empty_content() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let svc = service(db);
        let result = svc.edit("m1", "t1", "   ".to_string()).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
