//! Create `join_request` table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JoinRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JoinRequest::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JoinRequest::ClanId).string_len(32).not_null())
                    .col(ColumnDef::new(JoinRequest::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(JoinRequest::Message).text())
                    .col(
                        ColumnDef::new(JoinRequest::Status)
                            .string_len(20)
                            .not_null()
                            .default("submitted"),
                    )
                    .col(
                        ColumnDef::new(JoinRequest::AllowAnotherApplication)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(JoinRequest::ReviewedBy).string_len(32))
                    .col(
                        ColumnDef::new(JoinRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(JoinRequest::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_join_request_clan")
                            .from(JoinRequest::Table, JoinRequest::ClanId)
                            .to(Clan::Table, Clan::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_join_request_user")
                            .from(JoinRequest::Table, JoinRequest::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_join_request_clan_id")
                    .table(JoinRequest::Table)
                    .col(JoinRequest::ClanId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_join_request_user_id")
                    .table(JoinRequest::Table)
                    .col(JoinRequest::UserId)
                    .to_owned(),
            )
            .await?;

        // One actionable request per user per clan.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_join_request_one_open \
                 ON join_request (clan_id, user_id) WHERE status = 'submitted'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JoinRequest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum JoinRequest {
    Table,
    Id,
    ClanId,
    UserId,
    Message,
    Status,
    AllowAnotherApplication,
    ReviewedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Clan {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
