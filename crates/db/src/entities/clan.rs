//! Clan entity - a self-governing group subject to platform moderation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Clan visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[derive(Default)]
pub enum ClanVisibility {
    /// Listed and visible to everyone.
    #[sea_orm(string_value = "visible")]
    #[default]
    Visible,
    /// Hidden from listings.
    #[sea_orm(string_value = "hidden")]
    Hidden,
}

/// Whether the clan currently accepts join applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[derive(Default)]
pub enum ApplicationStatus {
    /// Join applications are accepted.
    #[sea_orm(string_value = "open")]
    #[default]
    Open,
    /// Join applications are rejected up front.
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// Clan model.
///
/// `suspended` is derived state: it is true exactly when an Active
/// suspension record exists for the clan. Both are always written in the
/// same transaction.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clan")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// User who owns the clan; mirrors the Creator staff assignment.
    #[sea_orm(indexed)]
    pub owner_id: String,

    /// Clan name.
    pub name: String,

    /// Clan description (optional).
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Visibility in listings and search.
    pub visibility: ClanVisibility,

    /// Whether join applications are accepted.
    pub application_status: ApplicationStatus,

    /// Whether the clan is suspended platform-wide.
    #[sea_orm(default_value = false)]
    pub suspended: bool,

    /// When the clan was created.
    pub created_at: DateTimeWithTimeZone,

    /// When the clan was last updated.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::clan_member::Entity")]
    Members,
    #[sea_orm(has_many = "super::suspension_record::Entity")]
    SuspensionRecords,
    #[sea_orm(has_many = "super::join_request::Entity")]
    JoinRequests,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::clan_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::suspension_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuspensionRecords.def()
    }
}

impl Related<super::join_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JoinRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
