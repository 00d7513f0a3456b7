//! User entity.
//!
//! Identity and session management live outside this engine; the user row
//! here carries only what moderation needs: the platform-wide role and a
//! stable external key that outlives the account.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Platform-wide role, independent of any clan.
///
/// Gates platform-moderation operations (impose/lift clan bans, appeal
/// review), as opposed to clan staff roles which gate in-clan actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[derive(Default)]
pub enum PlatformRole {
    /// Regular user with no platform authority.
    #[sea_orm(string_value = "none")]
    #[default]
    None,
    /// Platform moderator.
    #[sea_orm(string_value = "moderator")]
    Moderator,
    /// Platform administrator.
    #[sea_orm(string_value = "administrator")]
    Administrator,
    /// Platform developer.
    #[sea_orm(string_value = "developer")]
    Developer,
}

impl PlatformRole {
    /// Whether this role may perform platform-moderation operations.
    #[must_use]
    pub const fn can_moderate(self) -> bool {
        matches!(self, Self::Moderator | Self::Administrator | Self::Developer)
    }
}

/// User model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Unique username.
    #[sea_orm(unique)]
    pub username: String,

    /// Platform-wide moderation role.
    pub platform_role: PlatformRole,

    /// Stable external identifier, captured onto ban records at creation
    /// time so a ban survives deletion of the account row.
    #[sea_orm(unique)]
    pub stable_key: String,

    /// When the user was created.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::clan_member::Entity")]
    Memberships,
}

impl Related<super::clan_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_moderation_gate() {
        assert!(!PlatformRole::None.can_moderate());
        assert!(PlatformRole::Moderator.can_moderate());
        assert!(PlatformRole::Administrator.can_moderate());
        assert!(PlatformRole::Developer.can_moderate());
    }
}
