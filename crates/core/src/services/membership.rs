//! Member registry: suspensions, expulsions and staff roles inside a clan.

use chrono::Utc;
use clanhub_common::{AppError, AppResult, IdGenerator, validate_id};
use clanhub_db::{
    entities::{ClanMember, clan_member, staff_assignment, staff_assignment::StaffRole},
    repositories::ClanRepository,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use tracing::info;

use super::{
    actor::Actor,
    audit::{AuditEvent, AuditSink, emit},
    authorizer::{ClanRole, StaffAction, StaffActionRequest, authorize},
};

/// Registry of clan memberships and their staff roles.
#[derive(Clone)]
pub struct MembershipService {
    clan_repo: ClanRepository,
    id_gen: IdGenerator,
}

impl MembershipService {
    /// Create a new membership service.
    #[must_use]
    pub const fn new(clan_repo: ClanRepository) -> Self {
        Self {
            clan_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a membership together with the member's effective role.
    pub async fn get_membership(
        &self,
        clan_id: &str,
        user_id: &str,
    ) -> AppResult<(clan_member::Model, ClanRole)> {
        validate_id(clan_id)?;
        validate_id(user_id)?;
        let (member, assignment) = self
            .clan_repo
            .find_member_with_role(clan_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership not found".to_string()))?;
        Ok((member, ClanRole::from(assignment.map(|a| a.role))))
    }

    /// Create a membership directly, without the join request gate.
    ///
    /// Used for the clan creator at clan creation and by tooling; normal
    /// admissions go through the join request workflow.
    pub async fn create_membership(
        &self,
        clan_id: &str,
        user_id: &str,
    ) -> AppResult<clan_member::Model> {
        validate_id(clan_id)?;
        validate_id(user_id)?;
        if self.clan_repo.is_member(clan_id, user_id).await? {
            return Err(AppError::Conflict(
                "User is already a member of this clan".to_string(),
            ));
        }
        self.clan_repo.get_by_id(clan_id).await?;
        self.clan_repo
            .add_member(clan_member::ActiveModel {
                id: Set(self.id_gen.generate()),
                clan_id: Set(clan_id.to_string()),
                user_id: Set(user_id.to_string()),
                suspended: Set(false),
                joined_at: Set(Utc::now().into()),
                updated_at: Set(None),
            })
            .await
    }

    /// Resolve actor and target roles and run the staff authorizer.
    ///
    /// Returns the target membership and its staff assignment so the
    /// caller can act on them without re-fetching.
    async fn authorize_action(
        &self,
        actor: &Actor,
        clan_id: &str,
        target_user_id: &str,
        action: StaffAction,
    ) -> AppResult<(clan_member::Model, Option<staff_assignment::Model>)> {
        validate_id(clan_id)?;
        validate_id(target_user_id)?;

        let actor_role = ClanRole::from(
            self.clan_repo
                .get_member_role(clan_id, &actor.user_id)
                .await?,
        );
        let (target, assignment) = self
            .clan_repo
            .find_member_with_role(clan_id, target_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership not found".to_string()))?;
        let target_role = ClanRole::from(assignment.as_ref().map(|a| a.role));

        authorize(&StaffActionRequest {
            actor_id: &actor.user_id,
            actor_role,
            target_id: target_user_id,
            target_role,
            target_suspended: target.suspended,
            action,
        })?;
        Ok((target, assignment))
    }

    /// Lock the membership row and flip its suspension flag.
    ///
    /// The decision re-reads the row under the lock so a concurrent
    /// flip observes the committed state, not the one authorization saw.
    async fn set_suspended(
        &self,
        clan_id: &str,
        target_user_id: &str,
        suspended: bool,
    ) -> AppResult<clan_member::Model> {
        let txn = self
            .clan_repo
            .db()
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let target = ClanMember::find()
            .filter(clan_member::Column::ClanId.eq(clan_id))
            .filter(clan_member::Column::UserId.eq(target_user_id))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Membership not found".to_string()))?;
        if suspended && target.suspended {
            return Err(AppError::Conflict("Member is already suspended".to_string()));
        }
        if !suspended && !target.suspended {
            return Err(AppError::NotFound("Member is not suspended".to_string()));
        }

        let mut update: clan_member::ActiveModel = target.into();
        update.suspended = Set(suspended);
        update.updated_at = Set(Some(Utc::now().into()));
        let member = update
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(member)
    }

    /// Suspend a member within the clan.
    pub async fn suspend_member(
        &self,
        actor: &Actor,
        clan_id: &str,
        target_user_id: &str,
    ) -> AppResult<clan_member::Model> {
        self.authorize_action(actor, clan_id, target_user_id, StaffAction::Suspend)
            .await?;
        let member = self.set_suspended(clan_id, target_user_id, true).await?;

        info!(clan_id = %member.clan_id, user_id = %member.user_id, "member suspended");
        Ok(member)
    }

    /// Lift a member's suspension. Requires the same authority as
    /// suspending.
    pub async fn unsuspend_member(
        &self,
        actor: &Actor,
        clan_id: &str,
        target_user_id: &str,
    ) -> AppResult<clan_member::Model> {
        self.authorize_action(actor, clan_id, target_user_id, StaffAction::Suspend)
            .await?;
        let member = self.set_suspended(clan_id, target_user_id, false).await?;

        info!(clan_id = %member.clan_id, user_id = %member.user_id, "member suspension lifted");
        Ok(member)
    }

    /// Expel a member: hard-delete the membership and any staff
    /// assignment in one transaction. Suspended members cannot be
    /// expelled until unsuspended.
    pub async fn expel_member(
        &self,
        actor: &Actor,
        clan_id: &str,
        target_user_id: &str,
    ) -> AppResult<()> {
        let (target, assignment) = self
            .authorize_action(actor, clan_id, target_user_id, StaffAction::Expel)
            .await?;

        let txn = self
            .clan_repo
            .db()
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if let Some(assignment) = assignment {
            assignment
                .delete(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        target
            .delete(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(clan_id = %clan_id, user_id = %target_user_id, "member expelled");
        Ok(())
    }

    /// Grant a staff role, replacing any existing assignment.
    ///
    /// The Creator role can never be granted here; ownership transfer is
    /// the only way it moves.
    pub async fn assign_role(
        &self,
        actor: &Actor,
        clan_id: &str,
        target_user_id: &str,
        role: StaffRole,
    ) -> AppResult<staff_assignment::Model> {
        if role == StaffRole::Creator {
            return Err(AppError::TransferOwnershipRequired);
        }
        let (target, assignment) = self
            .authorize_action(actor, clan_id, target_user_id, StaffAction::AssignRole)
            .await?;

        let assignment = if let Some(existing) = assignment {
            let mut update: staff_assignment::ActiveModel = existing.into();
            update.role = Set(role);
            update
                .update(self.clan_repo.db())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
        } else {
            staff_assignment::ActiveModel {
                id: Set(self.id_gen.generate()),
                member_id: Set(target.id),
                clan_id: Set(clan_id.to_string()),
                role: Set(role),
                assigned_at: Set(Utc::now().into()),
            }
            .insert(self.clan_repo.db())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        };

        info!(clan_id = %clan_id, user_id = %target_user_id, role = ?assignment.role, "staff role assigned");
        Ok(assignment)
    }

    /// Revoke a staff role.
    pub async fn unassign_role(
        &self,
        actor: &Actor,
        clan_id: &str,
        target_user_id: &str,
    ) -> AppResult<()> {
        let (_, assignment) = self
            .authorize_action(actor, clan_id, target_user_id, StaffAction::UnassignRole)
            .await?;
        let assignment = assignment
            .ok_or_else(|| AppError::NotFound("Member has no staff role".to_string()))?;

        assignment
            .delete(self.clan_repo.db())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(clan_id = %clan_id, user_id = %target_user_id, "staff role revoked");
        Ok(())
    }

    /// Suspend a member and publish an audit event.
    pub async fn suspend_member_audited(
        &self,
        actor: &Actor,
        clan_id: &str,
        target_user_id: &str,
        sink: &dyn AuditSink,
    ) -> AppResult<clan_member::Model> {
        let member = self.suspend_member(actor, clan_id, target_user_id).await?;
        emit(
            sink,
            AuditEvent::MemberSuspended {
                clan_id: member.clan_id.clone(),
                user_id: member.user_id.clone(),
            },
        )
        .await;
        Ok(member)
    }

    /// Unsuspend a member and publish an audit event.
    pub async fn unsuspend_member_audited(
        &self,
        actor: &Actor,
        clan_id: &str,
        target_user_id: &str,
        sink: &dyn AuditSink,
    ) -> AppResult<clan_member::Model> {
        let member = self
            .unsuspend_member(actor, clan_id, target_user_id)
            .await?;
        emit(
            sink,
            AuditEvent::MemberUnsuspended {
                clan_id: member.clan_id.clone(),
                user_id: member.user_id.clone(),
            },
        )
        .await;
        Ok(member)
    }

    /// Expel a member and publish an audit event.
    pub async fn expel_member_audited(
        &self,
        actor: &Actor,
        clan_id: &str,
        target_user_id: &str,
        sink: &dyn AuditSink,
    ) -> AppResult<()> {
        self.expel_member(actor, clan_id, target_user_id).await?;
        emit(
            sink,
            AuditEvent::MemberExpelled {
                clan_id: clan_id.to_string(),
                user_id: target_user_id.to_string(),
            },
        )
        .await;
        Ok(())
    }

    /// Assign a role and publish an audit event.
    pub async fn assign_role_audited(
        &self,
        actor: &Actor,
        clan_id: &str,
        target_user_id: &str,
        role: StaffRole,
        sink: &dyn AuditSink,
    ) -> AppResult<staff_assignment::Model> {
        let assignment = self
            .assign_role(actor, clan_id, target_user_id, role)
            .await?;
        emit(
            sink,
            AuditEvent::RoleAssigned {
                clan_id: clan_id.to_string(),
                user_id: target_user_id.to_string(),
                role: format!("{:?}", assignment.role).to_lowercase(),
            },
        )
        .await;
        Ok(assignment)
    }

    /// Unassign a role and publish an audit event.
    pub async fn unassign_role_audited(
        &self,
        actor: &Actor,
        clan_id: &str,
        target_user_id: &str,
        sink: &dyn AuditSink,
    ) -> AppResult<()> {
        self.unassign_role(actor, clan_id, target_user_id).await?;
        emit(
            sink,
            AuditEvent::RoleUnassigned {
                clan_id: clan_id.to_string(),
                user_id: target_user_id.to_string(),
            },
        )
        .await;
        Ok(())
    }
}
