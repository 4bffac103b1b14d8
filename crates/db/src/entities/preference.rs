//! Preference entity (per-profile settings, 1:1 with profile).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "preference")]
pub struct Model {
    /// Same as profile.id (1:1 relationship)
    #[sea_orm(primary_key, auto_increment = false)]
    pub profile_id: String,

    /// UI theme: "light", "dark", or "system"
    #[sea_orm(default_value = "system")]
    pub theme: String,

    /// Global notification switch
    #[sea_orm(default_value = true)]
    pub notifications_enabled: bool,

    /// Notify on new direct messages?
    #[sea_orm(default_value = true)]
    pub notify_on_message: bool,

    /// Notify when mentioned?
    #[sea_orm(default_value = true)]
    pub notify_on_mention: bool,

    /// Notify on thread replies?
    #[sea_orm(default_value = true)]
    pub notify_on_reply: bool,

    /// Muted channel IDs (JSON array of strings)
    #[sea_orm(column_type = "JsonBinary")]
    pub muted_channels: Json,

    /// Compact message display?
    #[sea_orm(default_value = false)]
    pub compact_view: bool,

    /// Font size: "small", "medium", or "large"
    #[sea_orm(default_value = "medium")]
    pub font_size: String,

    /// Time format: "12h" or "24h"
    #[sea_orm(default_value = "12h")]
    pub time_format: String,

    /// Date format pattern
    #[sea_orm(default_value = "MM/DD/YYYY")]
    pub date_format: String,

    /// IANA timezone name
    #[sea_orm(default_value = "UTC")]
    pub timezone: String,

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
    Profile,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
