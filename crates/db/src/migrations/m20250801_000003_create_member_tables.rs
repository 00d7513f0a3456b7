//! Create `clan_member` and `staff_assignment` tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create clan_member table
        manager
            .create_table(
                Table::create()
                    .table(ClanMember::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClanMember::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClanMember::ClanId).string_len(32).not_null())
                    .col(ColumnDef::new(ClanMember::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(ClanMember::Suspended)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ClanMember::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ClanMember::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clan_member_clan")
                            .from(ClanMember::Table, ClanMember::ClanId)
                            .to(Clan::Table, Clan::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clan_member_user")
                            .from(ClanMember::Table, ClanMember::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clan_member_unique")
                    .table(ClanMember::Table)
                    .col(ClanMember::ClanId)
                    .col(ClanMember::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clan_member_user_id")
                    .table(ClanMember::Table)
                    .col(ClanMember::UserId)
                    .to_owned(),
            )
            .await?;

        // Create staff_assignment table
        manager
            .create_table(
                Table::create()
                    .table(StaffAssignment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StaffAssignment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StaffAssignment::MemberId)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(StaffAssignment::ClanId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StaffAssignment::Role)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StaffAssignment::AssignedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_assignment_member")
                            .from(StaffAssignment::Table, StaffAssignment::MemberId)
                            .to(ClanMember::Table, ClanMember::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_assignment_clan")
                            .from(StaffAssignment::Table, StaffAssignment::ClanId)
                            .to(Clan::Table, Clan::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_staff_assignment_clan_id")
                    .table(StaffAssignment::Table)
                    .col(StaffAssignment::ClanId)
                    .to_owned(),
            )
            .await?;

        // Exactly one creator per clan. Partial unique indexes have no
        // sea-query builder, so raw SQL it is.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_staff_assignment_one_creator \
                 ON staff_assignment (clan_id) WHERE role = 'creator'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StaffAssignment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClanMember::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ClanMember {
    Table,
    Id,
    ClanId,
    UserId,
    Suspended,
    JoinedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum StaffAssignment {
    Table,
    Id,
    MemberId,
    ClanId,
    Role,
    AssignedAt,
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
