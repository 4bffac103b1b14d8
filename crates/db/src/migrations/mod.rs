//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250801_000001_create_profile_table;
mod m20250801_000002_create_channel_table;
mod m20250801_000003_create_message_table;
mod m20250801_000004_create_thread_message_table;
mod m20250801_000005_create_direct_message_table;
mod m20250801_000006_create_notification_table;
mod m20250801_000007_create_preference_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_profile_table::Migration),
            Box::new(m20250801_000002_create_channel_table::Migration),
            Box::new(m20250801_000003_create_message_table::Migration),
            Box::new(m20250801_000004_create_thread_message_table::Migration),
            Box::new(m20250801_000005_create_direct_message_table::Migration),
            Box::new(m20250801_000006_create_notification_table::Migration),
            Box::new(m20250801_000007_create_preference_table::Migration),
        ]
    }
}
