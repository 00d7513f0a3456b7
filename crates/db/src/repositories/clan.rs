//! Clan repository: clans, members, and staff assignments.

use std::sync::Arc;

use clanhub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::entities::staff_assignment::StaffRole;
use crate::entities::{Clan, ClanMember, StaffAssignment, clan, clan_member, staff_assignment};

/// Repository for clan, membership, and staff-assignment reads and simple
/// writes. Multi-entity transitions run as transactions in the core
/// services through [`Self::db`].
#[derive(Clone)]
pub struct ClanRepository {
    db: Arc<DatabaseConnection>,
}

impl ClanRepository {
    /// Create a new clan repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get reference to the database connection.
    pub fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    // ==================== Clan Operations ====================

    /// Find clan by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<clan::Model>> {
        Clan::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get clan by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<clan::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Clan not found: {id}")))
    }

    /// Find clans owned by a user.
    pub async fn find_owned_by_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<clan::Model>> {
        Clan::find()
            .filter(clan::Column::OwnerId.eq(user_id))
            .order_by(clan::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a clan.
    pub async fn update(&self, model: clan::ActiveModel) -> AppResult<clan::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ==================== Member Operations ====================

    /// Find a membership by clan and user.
    pub async fn find_member(
        &self,
        clan_id: &str,
        user_id: &str,
    ) -> AppResult<Option<clan_member::Model>> {
        ClanMember::find()
            .filter(clan_member::Column::ClanId.eq(clan_id))
            .filter(clan_member::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a membership by clan and user, returning an error if absent.
    pub async fn get_member(&self, clan_id: &str, user_id: &str) -> AppResult<clan_member::Model> {
        self.find_member(clan_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} is not a member")))
    }

    /// Whether a user is a member of a clan.
    pub async fn is_member(&self, clan_id: &str, user_id: &str) -> AppResult<bool> {
        Ok(self.find_member(clan_id, user_id).await?.is_some())
    }

    /// List members of a clan.
    pub async fn list_members(
        &self,
        clan_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<clan_member::Model>> {
        ClanMember::find()
            .filter(clan_member::Column::ClanId.eq(clan_id))
            .order_by(clan_member::Column::JoinedAt, Order::Asc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a membership.
    pub async fn add_member(&self, model: clan_member::ActiveModel) -> AppResult<clan_member::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ==================== Staff Assignments ====================

    /// Find the staff assignment attached to a member, if any.
    pub async fn find_assignment(
        &self,
        member_id: &str,
    ) -> AppResult<Option<staff_assignment::Model>> {
        StaffAssignment::find()
            .filter(staff_assignment::Column::MemberId.eq(member_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a membership together with its staff assignment.
    ///
    /// Absence of an assignment is meaningful (the implicit lowest rank),
    /// so both layers are returned as-is.
    pub async fn find_member_with_role(
        &self,
        clan_id: &str,
        user_id: &str,
    ) -> AppResult<Option<(clan_member::Model, Option<staff_assignment::Model>)>> {
        ClanMember::find()
            .filter(clan_member::Column::ClanId.eq(clan_id))
            .filter(clan_member::Column::UserId.eq(user_id))
            .find_also_related(StaffAssignment)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the explicit staff role of a user in a clan, if any.
    pub async fn get_member_role(
        &self,
        clan_id: &str,
        user_id: &str,
    ) -> AppResult<Option<StaffRole>> {
        Ok(self
            .find_member_with_role(clan_id, user_id)
            .await?
            .and_then(|(_, assignment)| assignment.map(|a| a.role)))
    }

    /// List staff assignments of a clan.
    pub async fn list_staff(&self, clan_id: &str) -> AppResult<Vec<staff_assignment::Model>> {
        StaffAssignment::find()
            .filter(staff_assignment::Column::ClanId.eq(clan_id))
            .order_by(staff_assignment::Column::AssignedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
