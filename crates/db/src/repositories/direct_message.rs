//! Direct message repository.

use crate::entities::{DirectMessage, direct_message::{self, Column}};
use chattr_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use std::sync::Arc;

/// Repository for direct message operations.
#[derive(Clone)]
pub struct DirectMessageRepository {
    db: Arc<DatabaseConnection>,
}

impl DirectMessageRepository {
    /// Create a new direct message repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new direct message.
    pub async fn create(&self, model: direct_message::ActiveModel) -> AppResult<direct_message::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a direct message by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<direct_message::Model>> {
        DirectMessage::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a direct message by client correlation token.
    pub async fn find_by_client_token(
        &self,
        token: &str,
    ) -> AppResult<Option<direct_message::Model>> {
        DirectMessage::find()
            .filter(Column::ClientToken.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find messages in a conversation between two profiles, sorted by
    /// `created_at` ascending.
    pub async fn find_conversation(
        &self,
        profile_id: &str,
        partner_id: &str,
    ) -> AppResult<Vec<direct_message::Model>> {
        DirectMessage::find()
            .filter(
                // Messages sent by profile to partner OR by partner to profile
                sea_orm::Condition::any()
                    .add(
                        sea_orm::Condition::all()
                            .add(Column::SenderId.eq(profile_id))
                            .add(Column::ReceiverId.eq(partner_id)),
                    )
                    .add(
                        sea_orm::Condition::all()
                            .add(Column::SenderId.eq(partner_id))
                            .add(Column::ReceiverId.eq(profile_id)),
                    ),
            )
            .order_by(Column::CreatedAt, Order::Asc)
            .order_by(Column::Id, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get conversation partner IDs for a profile (profiles they have
    /// messaged or been messaged by).
    pub async fn find_conversation_partners(&self, profile_id: &str) -> AppResult<Vec<String>> {
        use sea_orm::{ConnectionTrait, Statement};

        let sql = r"
            SELECT DISTINCT partner_id FROM (
                SELECT receiver_id AS partner_id FROM direct_message
                WHERE sender_id = $1
                UNION
                SELECT sender_id AS partner_id FROM direct_message
                WHERE receiver_id = $1
            ) AS partners
            ORDER BY partner_id
            ";

        let result = self
            .db
            .query_all(Statement::from_sql_and_values(
                sea_orm::DatabaseBackend::Postgres,
                sql,
                [profile_id.into()],
            ))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut partners = Vec::new();
        for row in result {
            if let Ok(partner_id) = row.try_get::<String>("", "partner_id") {
                partners.push(partner_id);
            }
        }

        Ok(partners)
    }

    /// Find the latest message in a conversation.
    pub async fn find_latest_in_conversation(
        &self,
        profile_id: &str,
        partner_id: &str,
    ) -> AppResult<Option<direct_message::Model>> {
        DirectMessage::find()
            .filter(
                sea_orm::Condition::any()
                    .add(
                        sea_orm::Condition::all()
                            .add(Column::SenderId.eq(profile_id))
                            .add(Column::ReceiverId.eq(partner_id)),
                    )
                    .add(
                        sea_orm::Condition::all()
                            .add(Column::SenderId.eq(partner_id))
                            .add(Column::ReceiverId.eq(profile_id)),
                    ),
            )
            .order_by(Column::CreatedAt, Order::Desc)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count unread messages sent by `partner_id` to `profile_id`.
    pub async fn count_unread_from(&self, profile_id: &str, partner_id: &str) -> AppResult<u64> {
        DirectMessage::find()
            .filter(Column::SenderId.eq(partner_id))
            .filter(Column::ReceiverId.eq(profile_id))
            .filter(Column::IsRead.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark all unread messages from `sender_id` to `reader_id` as read.
    /// Returns the number of rows updated.
    pub async fn mark_as_read(&self, reader_id: &str, sender_id: &str) -> AppResult<u64> {
        let result = DirectMessage::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::SenderId.eq(sender_id))
            .filter(Column::ReceiverId.eq(reader_id))
            .filter(Column::IsRead.eq(false))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
