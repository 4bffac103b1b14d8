//! Create direct message table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DirectMessage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DirectMessage::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DirectMessage::Content).text().not_null())
                    .col(
                        ColumnDef::new(DirectMessage::SenderId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DirectMessage::ReceiverId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DirectMessage::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(DirectMessage::ClientToken)
                            .string_len(64)
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DirectMessage::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DirectMessage::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_direct_message_sender")
                            .from(DirectMessage::Table, DirectMessage::SenderId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_direct_message_receiver")
                            .from(DirectMessage::Table, DirectMessage::ReceiverId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on sender_id
        manager
            .create_index(
                Index::create()
                    .name("idx_direct_message_sender_id")
                    .table(DirectMessage::Table)
                    .col(DirectMessage::SenderId)
                    .to_owned(),
            )
            .await?;

        // Composite index for unread counting per receiver
        manager
            .create_index(
                Index::create()
                    .name("idx_direct_message_receiver_is_read")
                    .table(DirectMessage::Table)
                    .col(DirectMessage::ReceiverId)
                    .col(DirectMessage::IsRead)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DirectMessage::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DirectMessage {
    Table,
    Id,
    Content,
    SenderId,
    ReceiverId,
    IsRead,
    ClientToken,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Profile {
    Table,
    Id,
}
