//! Create `suspension_record` and `appeal_record` tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create suspension_record table
        manager
            .create_table(
                Table::create()
                    .table(SuspensionRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SuspensionRecord::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SuspensionRecord::ClanId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionRecord::Justification)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionRecord::Permanent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SuspensionRecord::AllowAppealAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(SuspensionRecord::Status)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(SuspensionRecord::IssuedBy)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionRecord::OwnerKey)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SuspensionRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(SuspensionRecord::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_suspension_record_clan")
                            .from(SuspensionRecord::Table, SuspensionRecord::ClanId)
                            .to(Clan::Table, Clan::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_suspension_record_clan_id")
                    .table(SuspensionRecord::Table)
                    .col(SuspensionRecord::ClanId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_suspension_record_status")
                    .table(SuspensionRecord::Table)
                    .col(SuspensionRecord::Status)
                    .to_owned(),
            )
            .await?;

        // Storage-level backstop against racing impose_ban calls: at most
        // one Active record per clan, regardless of application logic.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_suspension_record_one_active \
                 ON suspension_record (clan_id) WHERE status = 'active'",
            )
            .await?;

        // Create appeal_record table
        manager
            .create_table(
                Table::create()
                    .table(AppealRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AppealRecord::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AppealRecord::BanId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(AppealRecord::ClanId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AppealRecord::Justification).text().not_null())
                    .col(ColumnDef::new(AppealRecord::Comments).text())
                    .col(
                        ColumnDef::new(AppealRecord::AllowAnotherAppeal)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AppealRecord::Status)
                            .string_len(20)
                            .not_null()
                            .default("submitted"),
                    )
                    .col(ColumnDef::new(AppealRecord::ReviewedBy).string_len(32))
                    .col(
                        ColumnDef::new(AppealRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(AppealRecord::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appeal_record_ban")
                            .from(AppealRecord::Table, AppealRecord::BanId)
                            .to(SuspensionRecord::Table, SuspensionRecord::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appeal_record_clan")
                            .from(AppealRecord::Table, AppealRecord::ClanId)
                            .to(Clan::Table, Clan::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_appeal_record_ban_id")
                    .table(AppealRecord::Table)
                    .col(AppealRecord::BanId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_appeal_record_clan_id")
                    .table(AppealRecord::Table)
                    .col(AppealRecord::ClanId)
                    .to_owned(),
            )
            .await?;

        // At most one appeal per ban that is still open: two concurrent
        // reviews cannot both move an appeal out of a non-terminal state,
        // and a second submission cannot slip in alongside an open one.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_appeal_record_one_open \
                 ON appeal_record (ban_id) WHERE status IN ('submitted', 'in_review')",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AppealRecord::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SuspensionRecord::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SuspensionRecord {
    Table,
    Id,
    ClanId,
    Justification,
    Permanent,
    AllowAppealAt,
    Status,
    IssuedBy,
    OwnerKey,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AppealRecord {
    Table,
    Id,
    BanId,
    ClanId,
    Justification,
    Comments,
    AllowAnotherAppeal,
    Status,
    ReviewedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Clan {
    Table,
    Id,
}
