//! Clan lifecycle: creation, settings and ownership transfer.

use chrono::Utc;
use clanhub_common::{AppError, AppResult, IdGenerator, validate_id};
use clanhub_db::{
    entities::{
        Clan, StaffAssignment, clan,
        clan::{ApplicationStatus, ClanVisibility},
        clan_member, staff_assignment,
        staff_assignment::StaffRole,
    },
    repositories::{ClanRepository, UserRepository},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use validator::Validate;

use super::{
    actor::Actor,
    audit::{AuditEvent, AuditSink, emit},
    authorizer::ClanRole,
};

/// Input for creating a clan.
#[derive(Validate)]
pub struct CreateClanInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub visibility: Option<ClanVisibility>,
    pub application_status: Option<ApplicationStatus>,
}

/// Input for updating clan settings.
///
/// `description` uses the double-`Option` convention: omission keeps the
/// stored value, an explicit null clears it.
#[derive(Default, Validate)]
pub struct UpdateClanInput {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub visibility: Option<ClanVisibility>,
    pub application_status: Option<ApplicationStatus>,
}

/// Service managing clans themselves.
#[derive(Clone)]
pub struct ClanService {
    clan_repo: ClanRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl ClanService {
    /// Create a new clan service.
    #[must_use]
    pub const fn new(clan_repo: ClanRepository, user_repo: UserRepository) -> Self {
        Self {
            clan_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    fn validate_name(name: &str) -> AppResult<&str> {
        // The derive catches empty and oversized names; this guards
        // whitespace-only input the length rule cannot see.
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Clan name is required".to_string()));
        }
        Ok(name)
    }

    /// Create a clan. The creating user becomes owner, member and
    /// Creator in one transaction.
    pub async fn create_clan(
        &self,
        actor: &Actor,
        input: CreateClanInput,
    ) -> AppResult<clan::Model> {
        input.validate()?;
        let name = Self::validate_name(&input.name)?;
        self.user_repo.get_by_id(&actor.user_id).await?;

        let txn = self
            .clan_repo
            .db()
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let clan = clan::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(actor.user_id.clone()),
            name: Set(name.to_string()),
            description: Set(input.description),
            visibility: Set(input.visibility.unwrap_or(ClanVisibility::Visible)),
            application_status: Set(input.application_status.unwrap_or(ApplicationStatus::Open)),
            suspended: Set(false),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let member = clan_member::ActiveModel {
            id: Set(self.id_gen.generate()),
            clan_id: Set(clan.id.clone()),
            user_id: Set(actor.user_id.clone()),
            suspended: Set(false),
            joined_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        staff_assignment::ActiveModel {
            id: Set(self.id_gen.generate()),
            member_id: Set(member.id),
            clan_id: Set(clan.id.clone()),
            role: Set(StaffRole::Creator),
            assigned_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(clan_id = %clan.id, owner_id = %clan.owner_id, "clan created");
        Ok(clan)
    }

    /// Create a clan and publish an audit event.
    pub async fn create_clan_audited(
        &self,
        actor: &Actor,
        input: CreateClanInput,
        sink: &dyn AuditSink,
    ) -> AppResult<clan::Model> {
        let clan = self.create_clan(actor, input).await?;
        emit(
            sink,
            AuditEvent::ClanCreated {
                clan_id: clan.id.clone(),
            },
        )
        .await;
        Ok(clan)
    }

    /// Get a clan by ID.
    pub async fn get_clan(&self, id: &str) -> AppResult<clan::Model> {
        validate_id(id)?;
        self.clan_repo.get_by_id(id).await
    }

    /// Update clan settings. Requires Creator or Administrator rank.
    pub async fn update_settings(
        &self,
        actor: &Actor,
        clan_id: &str,
        input: UpdateClanInput,
    ) -> AppResult<clan::Model> {
        validate_id(clan_id)?;
        input.validate()?;

        let role = ClanRole::from(
            self.clan_repo
                .get_member_role(clan_id, &actor.user_id)
                .await?,
        );
        if !role.can_manage_settings() {
            return Err(AppError::InvalidPermissions(
                "Only the creator or an administrator can change clan settings".to_string(),
            ));
        }

        let clan = self.clan_repo.get_by_id(clan_id).await?;
        let mut update: clan::ActiveModel = clan.into();
        if let Some(name) = &input.name {
            update.name = Set(Self::validate_name(name)?.to_string());
        }
        if let Some(description) = input.description {
            update.description = Set(description.filter(|d| !d.trim().is_empty()));
        }
        if let Some(visibility) = input.visibility {
            update.visibility = Set(visibility);
        }
        if let Some(application_status) = input.application_status {
            update.application_status = Set(application_status);
        }
        update.updated_at = Set(Some(Utc::now().into()));
        self.clan_repo.update(update).await
    }

    /// Transfer ownership to another member.
    ///
    /// Retargets `owner_id` and swaps the Creator assignment in one
    /// transaction: the new owner becomes Creator, the old owner drops
    /// to Administrator. Exactly one Creator exists throughout.
    pub async fn transfer_ownership(
        &self,
        actor: &Actor,
        clan_id: &str,
        new_owner_id: &str,
    ) -> AppResult<clan::Model> {
        validate_id(clan_id)?;
        validate_id(new_owner_id)?;
        if actor.user_id == new_owner_id {
            return Err(AppError::SelfActionAttempt);
        }

        let txn = self
            .clan_repo
            .db()
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let clan = Clan::find_by_id(clan_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Clan not found".to_string()))?;
        if clan.owner_id != actor.user_id {
            return Err(AppError::InvalidPermissions(
                "Only the clan owner can transfer ownership".to_string(),
            ));
        }

        let new_owner_member = clan_member::Entity::find()
            .filter(clan_member::Column::ClanId.eq(clan_id))
            .filter(clan_member::Column::UserId.eq(new_owner_id))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| {
                AppError::NotFound("New owner is not a member of this clan".to_string())
            })?;

        // Demote the old Creator before promoting the new one, so the
        // one-Creator index never sees two.
        let old_assignment = StaffAssignment::find()
            .filter(staff_assignment::Column::ClanId.eq(clan_id))
            .filter(staff_assignment::Column::Role.eq(StaffRole::Creator))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if let Some(old) = old_assignment {
            let mut demote: staff_assignment::ActiveModel = old.into();
            demote.role = Set(StaffRole::Administrator);
            demote
                .update(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        let existing = StaffAssignment::find()
            .filter(staff_assignment::Column::MemberId.eq(new_owner_member.id.as_str()))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if let Some(existing) = existing {
            let mut promote: staff_assignment::ActiveModel = existing.into();
            promote.role = Set(StaffRole::Creator);
            promote
                .update(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        } else {
            staff_assignment::ActiveModel {
                id: Set(self.id_gen.generate()),
                member_id: Set(new_owner_member.id.clone()),
                clan_id: Set(clan_id.to_string()),
                role: Set(StaffRole::Creator),
                assigned_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        }

        let mut clan_update: clan::ActiveModel = clan.into();
        clan_update.owner_id = Set(new_owner_id.to_string());
        clan_update.updated_at = Set(Some(Utc::now().into()));
        let clan = clan_update
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(clan_id = %clan.id, new_owner_id = %clan.owner_id, "clan ownership transferred");
        Ok(clan)
    }

    /// Transfer ownership and publish an audit event.
    pub async fn transfer_ownership_audited(
        &self,
        actor: &Actor,
        clan_id: &str,
        new_owner_id: &str,
        sink: &dyn AuditSink,
    ) -> AppResult<clan::Model> {
        let clan = self.transfer_ownership(actor, clan_id, new_owner_id).await?;
        emit(
            sink,
            AuditEvent::OwnershipTransferred {
                clan_id: clan.id.clone(),
                new_owner_id: clan.owner_id.clone(),
            },
        )
        .await;
        Ok(clan)
    }
}
