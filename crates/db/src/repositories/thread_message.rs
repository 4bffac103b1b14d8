//! Thread message repository.
//!
//! The parent message's `has_thread` flag is maintained in the same
//! transaction as reply insert/delete, so the flag can never drift from
//! the existence of replies.

use std::sync::Arc;

use crate::entities::{Message, ThreadMessage, message, thread_message};
use chattr_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};

/// Repository for thread reply operations.
#[derive(Clone)]
pub struct ThreadMessageRepository {
    db: Arc<DatabaseConnection>,
}

impl ThreadMessageRepository {
    /// Create a new thread message repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a thread reply by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<thread_message::Model>> {
        ThreadMessage::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a thread reply by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<thread_message::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Thread message not found: {id}")))
    }

    /// Find replies for a parent message, sorted by `created_at` ascending.
    pub async fn find_by_parent(&self, message_id: &str) -> AppResult<Vec<thread_message::Model>> {
        ThreadMessage::find()
            .filter(thread_message::Column::MessageId.eq(message_id))
            .order_by(thread_message::Column::CreatedAt, Order::Asc)
            .order_by(thread_message::Column::Id, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count replies for a parent message.
    pub async fn count_by_parent(&self, message_id: &str) -> AppResult<u64> {
        ThreadMessage::find()
            .filter(thread_message::Column::MessageId.eq(message_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a reply and set the parent's `has_thread` flag atomically.
    pub async fn create(
        &self,
        model: thread_message::ActiveModel,
    ) -> AppResult<thread_message::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let reply = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Message::update_many()
            .col_expr(message::Column::HasThread, Expr::value(true))
            .filter(message::Column::Id.eq(reply.message_id.clone()))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(reply)
    }

    /// Update a reply.
    pub async fn update(
        &self,
        model: thread_message::ActiveModel,
    ) -> AppResult<thread_message::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a reply and clear the parent's `has_thread` flag atomically
    /// when the deleted reply was the last one.
    pub async fn delete(&self, id: &str, message_id: &str) -> AppResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        ThreadMessage::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let remaining = ThreadMessage::find()
            .filter(thread_message::Column::MessageId.eq(message_id))
            .count(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if remaining == 0 {
            Message::update_many()
                .col_expr(message::Column::HasThread, Expr::value(false))
                .filter(message::Column::Id.eq(message_id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_reply(id: &str, message_id: &str, content: &str) -> thread_message::Model {
        thread_message::Model {
            id: id.to_string(),
            content: content.to_string(),
            message_id: message_id.to_string(),
            profile_id: "p1".to_string(),
            files: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_parent() {
        let r1 = create_test_reply("t1", "m1", "first reply");
        let r2 = create_test_reply("t2", "m1", "second reply");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = ThreadMessageRepository::new(db);
        let result = repo.find_by_parent("m1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].content, "first reply");
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let reply = create_test_reply("t1", "m1", "a reply");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[reply.clone()]])
                .into_connection(),
        );

        let repo = ThreadMessageRepository::new(db);
        let result = repo.find_by_id("t1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().message_id, "m1");
    }
}
