//! Join request entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status of a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[derive(Default)]
pub enum JoinRequestStatus {
    /// Awaiting staff review.
    #[sea_orm(string_value = "submitted")]
    #[default]
    Submitted,
    /// Accepted; a membership was created.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected.
    #[sea_orm(string_value = "denied")]
    Denied,
}

impl JoinRequestStatus {
    /// Whether the request still awaits a decision.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Submitted)
    }
}

/// Join request - a user applying for clan membership.
///
/// A user may have many historical requests per clan; at most one
/// Submitted request per (clan, user) is enforced by a partial unique
/// index. A denial with `allow_another_application == false` blocks new
/// requests until staff unblock it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "join_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The clan applied to.
    #[sea_orm(indexed)]
    pub clan_id: String,

    /// The applying user.
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Optional application message.
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    /// Current status.
    pub status: JoinRequestStatus,

    /// Whether the user may apply again after a denial.
    #[sea_orm(default_value = true)]
    pub allow_another_application: bool,

    /// Staff member who decided the request.
    #[sea_orm(nullable)]
    pub reviewed_by: Option<String>,

    /// When the request was submitted.
    pub created_at: DateTimeWithTimeZone,

    /// When the request was last updated.
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
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::clan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clan.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
