//! Staff assignment entity.
//!
//! A staff assignment is an optional 1:1 attachment to a clan member.
//! Absence of a row means the effective role is the implicit lowest rank;
//! that absence is modeled explicitly as `ClanRole::NoRole` in the core
//! authorizer rather than checked ad hoc at call sites.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Explicit staff rank held by a clan member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum StaffRole {
    /// Moderator - non-destructive oversight only.
    #[sea_orm(string_value = "moderator")]
    Moderator,
    /// Administrator - may act on moderators and roleless members.
    #[sea_orm(string_value = "administrator")]
    Administrator,
    /// Creator - full control; exactly one per clan.
    #[sea_orm(string_value = "creator")]
    Creator,
}

/// Staff assignment model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff_assignment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The member holding this rank. At most one assignment per member.
    #[sea_orm(unique)]
    pub member_id: String,

    /// The clan, denormalized for the one-creator-per-clan constraint.
    #[sea_orm(indexed)]
    pub clan_id: String,

    /// The rank granted.
    pub role: StaffRole,

    /// When the rank was granted.
    pub assigned_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clan_member::Entity",
        from = "Column::MemberId",
        to = "super::clan_member::Column::Id",
        on_delete = "Cascade"
    )]
    Member,
    #[sea_orm(
        belongs_to = "super::clan::Entity",
        from = "Column::ClanId",
        to = "super::clan::Column::Id",
        on_delete = "Cascade"
    )]
    Clan,
}

impl Related<super::clan_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl Related<super::clan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
