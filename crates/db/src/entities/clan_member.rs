//! Clan member entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Clan member - one user's membership in one clan.
///
/// `suspended` here is independent of the clan-level suspension: a clan
/// can be healthy while one member inside it is suspended, and vice versa.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clan_member")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The clan this membership belongs to.
    #[sea_orm(indexed)]
    pub clan_id: String,

    /// The user who is a member.
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Whether this member is suspended within the clan.
    #[sea_orm(default_value = false)]
    pub suspended: bool,

    /// When the user joined the clan.
    pub joined_at: DateTimeWithTimeZone,

    /// When the member record was last updated.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::clan::Entity",
        from = "Column::ClanId",
        to = "super::clan::Column::Id",
        on_delete = "Cascade"
    )]
    Clan,
    #[sea_orm(has_one = "super::staff_assignment::Entity")]
    StaffAssignment,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::clan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clan.def()
    }
}

impl Related<super::staff_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StaffAssignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
