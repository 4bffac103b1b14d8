//! Message entity for channel messages.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "message")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Message text content
    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Channel the message was posted to
    #[sea_orm(indexed)]
    pub channel_id: String,

    /// Author profile ID
    #[sea_orm(indexed)]
    pub profile_id: String,

    /// True iff at least one thread reply references this message.
    /// Maintained in the same transaction as reply insert/delete.
    #[sea_orm(default_value = false)]
    pub has_thread: bool,

    /// Attached file references (JSON array of strings)
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub files: Option<Json>,

    /// Client-generated correlation token. Unique when present; a resend
    /// with the same token returns the already-stored record.
    #[sea_orm(nullable, unique)]
    pub client_token: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    /// Edited when `updated_at > created_at`.
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::channel::Entity",
        from = "Column::ChannelId",
        to = "super::channel::Column::Id",
        on_delete = "Cascade"
    )]
    Channel,

    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::ProfileId",
        to = "super::profile::Column::Id",
        on_delete = "Cascade"
    )]
    Author,

    #[sea_orm(has_many = "super::thread_message::Entity")]
    ThreadMessages,
}

impl Related<super::channel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Channel.def()
    }
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::thread_message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ThreadMessages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
