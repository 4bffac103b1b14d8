//! Notification entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification types.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    #[sea_orm(string_value = "message")]
    Message,
    #[sea_orm(string_value = "mention")]
    Mention,
    #[sea_orm(string_value = "reply")]
    Reply,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The profile receiving the notification
    #[sea_orm(indexed)]
    pub profile_id: String,

    /// Notification type
    pub notification_type: NotificationType,

    /// Short headline shown in the feed
    pub title: String,

    /// Body text
    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Has this notification been read?
    #[sea_orm(default_value = false)]
    pub is_read: bool,

    /// ID of the originating record (message, thread reply, ...)
    #[sea_orm(nullable)]
    pub source_id: Option<String>,

    /// Kind of the originating record ("message", "thread", ...)
    #[sea_orm(nullable)]
    pub source_type: Option<String>,

    /// Related channel ID
    #[sea_orm(nullable)]
    pub channel_id: Option<String>,

    /// Related message ID
    #[sea_orm(nullable)]
    pub message_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::ProfileId",
        to = "super::profile::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,

    #[sea_orm(
        belongs_to = "super::channel::Entity",
        from = "Column::ChannelId",
        to = "super::channel::Column::Id",
        on_delete = "SetNull"
    )]
    Channel,

    #[sea_orm(
        belongs_to = "super::message::Entity",
        from = "Column::MessageId",
        to = "super::message::Column::Id",
        on_delete = "SetNull"
    )]
    Message,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
