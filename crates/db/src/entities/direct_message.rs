//! Direct message entity for one-to-one messages.
//!
//! A conversation is derived, not stored: it is the set of direct
//! messages between two profile IDs, grouped at query time.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "direct_message")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Message text content
    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Sender profile ID
    #[sea_orm(indexed)]
    pub sender_id: String,

    /// Receiver profile ID
    #[sea_orm(indexed)]
    pub receiver_id: String,

    /// Has the receiver read this message?
    #[sea_orm(default_value = false)]
    pub is_read: bool,

    /// Client-generated correlation token. Unique when present.
    #[sea_orm(nullable, unique)]
    pub client_token: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::SenderId",
        to = "super::profile::Column::Id",
        on_delete = "Cascade"
    )]
    Sender,

    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::ReceiverId",
        to = "super::profile::Column::Id",
        on_delete = "Cascade"
    )]
    Receiver,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
