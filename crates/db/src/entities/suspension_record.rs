//! Clan suspension record entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status of a clan suspension record.
///
/// Driven by the appeal workflow (or an explicit staff unban), never set
/// directly by staff otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[derive(Default)]
pub enum BanStatus {
    /// The clan is currently suspended under this record.
    #[sea_orm(string_value = "active")]
    #[default]
    Active,
    /// An appeal was approved (or staff lifted the ban); no longer in force.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// The appeal was denied; the record stays in force.
    #[sea_orm(string_value = "denied")]
    Denied,
}

impl BanStatus {
    /// Whether this record currently suspends the clan.
    #[must_use]
    pub const fn in_force(self) -> bool {
        !matches!(self, Self::Approved)
    }
}

/// Clan suspension record.
///
/// A clan accumulates records over time; only the most recent one whose
/// status is not Approved is "current". At most one Active record per clan
/// is enforced by a partial unique index.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "suspension_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The suspended clan.
    #[sea_orm(indexed)]
    pub clan_id: String,

    /// Why the clan was suspended.
    #[sea_orm(column_type = "Text")]
    pub justification: String,

    /// Permanent bans are never eligible for appeal.
    #[sea_orm(default_value = false)]
    pub permanent: bool,

    /// Earliest time an appeal may be submitted. Null means no cooldown.
    #[sea_orm(nullable)]
    pub allow_appeal_at: Option<DateTimeWithTimeZone>,

    /// Current status.
    pub status: BanStatus,

    /// Platform staff member who imposed the ban.
    pub issued_by: String,

    /// Stable key of the clan owner at ban time; survives account deletion.
    pub owner_key: String,

    /// When the ban was imposed.
    pub created_at: DateTimeWithTimeZone,

    /// When the record was last updated.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clan::Entity",
        from = "Column::ClanId",
        to = "super::clan::Column::Id",
        on_delete = "Cascade"
    )]
    Clan,
    #[sea_orm(has_many = "super::appeal_record::Entity")]
    Appeals,
}

impl Related<super::clan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clan.def()
    }
}

impl Related<super::appeal_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appeals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
