//! Suspension appeal entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status of a suspension appeal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[derive(Default)]
pub enum AppealStatus {
    /// Submitted by the clan creator, awaiting review.
    #[sea_orm(string_value = "submitted")]
    #[default]
    Submitted,
    /// Picked up by platform staff.
    #[sea_orm(string_value = "in_review")]
    InReview,
    /// Approved; the suspension is lifted.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Denied; the suspension stays in force.
    #[sea_orm(string_value = "denied")]
    Denied,
}

impl AppealStatus {
    /// Terminal states accept no further review.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Approved | Self::Denied)
    }
}

/// Appeal record attached to one suspension record.
///
/// At most one non-terminal appeal per suspension record, enforced by a
/// partial unique index. Once final the record is immutable except for
/// `allow_another_appeal`, which a privileged override may flip to
/// re-open eligibility.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "appeal_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The suspension record this appeal contests.
    #[sea_orm(indexed)]
    pub ban_id: String,

    /// The clan, denormalized for list queries and the staff unban saga.
    #[sea_orm(indexed)]
    pub clan_id: String,

    /// The creator's case for lifting the suspension.
    #[sea_orm(column_type = "Text")]
    pub justification: String,

    /// Reviewer comments. Null and empty are different signals: an
    /// explicitly empty string clears comments on review, null means
    /// none were ever set.
    #[sea_orm(column_type = "Text", nullable)]
    pub comments: Option<String>,

    /// Whether a new appeal may follow a denial.
    #[sea_orm(default_value = false)]
    pub allow_another_appeal: bool,

    /// Current status.
    pub status: AppealStatus,

    /// Platform staff member who reviewed the appeal.
    #[sea_orm(nullable)]
    pub reviewed_by: Option<String>,

    /// When the appeal was submitted.
    pub created_at: DateTimeWithTimeZone,

    /// When the appeal was last updated.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::suspension_record::Entity",
        from = "Column::BanId",
        to = "super::suspension_record::Column::Id",
        on_delete = "Cascade"
    )]
    SuspensionRecord,
    #[sea_orm(
        belongs_to = "super::clan::Entity",
        from = "Column::ClanId",
        to = "super::clan::Column::Id",
        on_delete = "Cascade"
    )]
    Clan,
}

impl Related<super::suspension_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuspensionRecord.def()
    }
}

impl Related<super::clan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
