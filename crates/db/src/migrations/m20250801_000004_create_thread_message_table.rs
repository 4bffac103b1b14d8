//! Create thread message table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ThreadMessage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ThreadMessage::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ThreadMessage::Content).text().not_null())
                    .col(
                        ColumnDef::new(ThreadMessage::MessageId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ThreadMessage::ProfileId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ThreadMessage::Files).json_binary())
                    .col(
                        ColumnDef::new(ThreadMessage::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ThreadMessage::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_thread_message_parent")
                            .from(ThreadMessage::Table, ThreadMessage::MessageId)
                            .to(Message::Table, Message::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_thread_message_author")
                            .from(ThreadMessage::Table, ThreadMessage::ProfileId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Composite index for the ascending reply timeline
        manager
            .create_index(
                Index::create()
                    .name("idx_thread_message_parent_created_at")
                    .table(ThreadMessage::Table)
                    .col(ThreadMessage::MessageId)
                    .col(ThreadMessage::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ThreadMessage::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ThreadMessage {
    Table,
    Id,
    Content,
    MessageId,
    ProfileId,
    Files,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Message {
    Table,
    Id,
}

#[derive(Iden)]
enum Profile {
    Table,
    Id,
}
