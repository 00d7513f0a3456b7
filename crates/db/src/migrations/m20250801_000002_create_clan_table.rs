//! Create clan table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clan::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clan::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clan::OwnerId).string_len(32).not_null())
                    .col(ColumnDef::new(Clan::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Clan::Description).text())
                    .col(
                        ColumnDef::new(Clan::Visibility)
                            .string_len(20)
                            .not_null()
                            .default("visible"),
                    )
                    .col(
                        ColumnDef::new(Clan::ApplicationStatus)
                            .string_len(20)
                            .not_null()
                            .default("open"),
                    )
                    .col(
                        ColumnDef::new(Clan::Suspended)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Clan::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Clan::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clan_owner")
                            .from(Clan::Table, Clan::OwnerId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clan_owner_id")
                    .table(Clan::Table)
                    .col(Clan::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clan_suspended")
                    .table(Clan::Table)
                    .col(Clan::Suspended)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Clan::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Clan {
    Table,
    Id,
    OwnerId,
    Name,
    Description,
    Visibility,
    ApplicationStatus,
    Suspended,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
