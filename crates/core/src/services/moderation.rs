//! Platform moderation service for clan-level bans.

use chrono::{DateTime, Utc};
use clanhub_common::{AppError, AppResult, IdGenerator, validate_id};
use clanhub_db::{
    entities::{
        Clan, SuspensionRecord, appeal_record,
        appeal_record::AppealStatus,
        clan, suspension_record,
        suspension_record::BanStatus,
    },
    repositories::{SuspensionRepository, UserRepository},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use validator::Validate;

use super::{
    actor::Actor,
    audit::{AuditEvent, AuditSink, emit},
};

/// Input for imposing a ban on a clan.
#[derive(Validate)]
pub struct ImposeBanInput {
    pub clan_id: String,
    #[validate(length(min = 1, max = 2000))]
    pub justification: String,
    /// Permanent bans can never be appealed.
    pub permanent: bool,
    /// Earliest instant an appeal may be submitted. `None` means
    /// appeals are allowed immediately. Ignored for permanent bans.
    pub allow_appeal_at: Option<DateTime<Utc>>,
}

/// Platform moderation service for clan bans.
#[derive(Clone)]
pub struct ModerationService {
    suspension_repo: SuspensionRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(suspension_repo: SuspensionRepository, user_repo: UserRepository) -> Self {
        Self {
            suspension_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    fn require_moderator(&self, actor: &Actor) -> AppResult<()> {
        if !actor.platform_role.can_moderate() {
            return Err(AppError::InvalidPermissions(
                "Only platform moderators can manage clan bans".to_string(),
            ));
        }
        Ok(())
    }

    /// Impose a ban on a clan, suspending it platform-wide.
    ///
    /// At most one ban per clan can be in `Active` status at a time; a
    /// second attempt while one is in force is a conflict.
    pub async fn impose_ban(
        &self,
        actor: &Actor,
        input: ImposeBanInput,
    ) -> AppResult<suspension_record::Model> {
        self.require_moderator(actor)?;
        validate_id(&input.clan_id)?;
        input.validate()?;

        let justification = input.justification.trim();
        if justification.is_empty() {
            return Err(AppError::Validation(
                "Ban justification is required".to_string(),
            ));
        }

        let txn = self
            .suspension_repo
            .db()
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Lock the clan row so concurrent bans serialize on it.
        let clan = Clan::find_by_id(&input.clan_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Clan not found".to_string()))?;

        let active = SuspensionRecord::find()
            .filter(suspension_record::Column::ClanId.eq(clan.id.as_str()))
            .filter(suspension_record::Column::Status.eq(BanStatus::Active))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if active.is_some() {
            return Err(AppError::Conflict("Clan is already suspended".to_string()));
        }

        // Snapshot the owner's stable key so the ban record survives
        // ownership transfers and account churn.
        let owner_key = self
            .user_repo
            .find_by_id(&clan.owner_id)
            .await?
            .map_or_else(|| clan.owner_id.clone(), |owner| owner.stable_key);

        let allow_appeal_at = if input.permanent {
            None
        } else {
            input.allow_appeal_at
        };

        let ban = suspension_record::ActiveModel {
            id: Set(self.id_gen.generate()),
            clan_id: Set(clan.id.clone()),
            justification: Set(justification.to_string()),
            permanent: Set(input.permanent),
            allow_appeal_at: Set(allow_appeal_at.map(Into::into)),
            status: Set(BanStatus::Active),
            issued_by: Set(actor.user_id.clone()),
            owner_key: Set(owner_key),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let mut clan_update: clan::ActiveModel = clan.into();
        clan_update.suspended = Set(true);
        clan_update.updated_at = Set(Some(Utc::now().into()));
        clan_update
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(clan_id = %ban.clan_id, ban_id = %ban.id, permanent = ban.permanent, "clan banned");
        Ok(ban)
    }

    /// Impose a ban and publish an audit event.
    pub async fn impose_ban_audited(
        &self,
        actor: &Actor,
        input: ImposeBanInput,
        sink: &dyn AuditSink,
    ) -> AppResult<suspension_record::Model> {
        let ban = self.impose_ban(actor, input).await?;
        emit(
            sink,
            AuditEvent::BanImposed {
                clan_id: ban.clan_id.clone(),
                ban_id: ban.id.clone(),
            },
        )
        .await;
        Ok(ban)
    }

    /// Lift the active ban on a clan, approving it and every
    /// unresolved appeal attached to the clan.
    pub async fn lift_ban(
        &self,
        actor: &Actor,
        clan_id: &str,
    ) -> AppResult<suspension_record::Model> {
        self.require_moderator(actor)?;
        validate_id(clan_id)?;

        let txn = self
            .suspension_repo
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

        let ban = SuspensionRecord::find()
            .filter(suspension_record::Column::ClanId.eq(clan.id.as_str()))
            .filter(suspension_record::Column::Status.eq(BanStatus::Active))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Clan is not suspended".to_string()))?;

        let mut ban_update: suspension_record::ActiveModel = ban.into();
        ban_update.status = Set(BanStatus::Approved);
        ban_update.updated_at = Set(Some(Utc::now().into()));
        let ban = ban_update
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Lifting a ban settles every appeal the clan still has open
        // or denied, so the history reads as resolved in its favor.
        let pending = appeal_record::Entity::find()
            .filter(appeal_record::Column::ClanId.eq(clan.id.as_str()))
            .filter(appeal_record::Column::Status.ne(AppealStatus::Approved))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        for appeal in pending {
            let mut update: appeal_record::ActiveModel = appeal.into();
            update.status = Set(AppealStatus::Approved);
            update.reviewed_by = Set(Some(actor.user_id.clone()));
            update.updated_at = Set(Some(Utc::now().into()));
            update
                .update(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        let mut clan_update: clan::ActiveModel = clan.into();
        clan_update.suspended = Set(false);
        clan_update.updated_at = Set(Some(Utc::now().into()));
        clan_update
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(clan_id = %ban.clan_id, ban_id = %ban.id, "clan ban lifted");
        Ok(ban)
    }

    /// Lift a ban and publish an audit event.
    pub async fn lift_ban_audited(
        &self,
        actor: &Actor,
        clan_id: &str,
        sink: &dyn AuditSink,
    ) -> AppResult<suspension_record::Model> {
        let ban = self.lift_ban(actor, clan_id).await?;
        emit(
            sink,
            AuditEvent::BanLifted {
                clan_id: ban.clan_id.clone(),
            },
        )
        .await;
        Ok(ban)
    }

    /// Get a ban record by ID.
    pub async fn get_ban(
        &self,
        actor: &Actor,
        ban_id: &str,
    ) -> AppResult<suspension_record::Model> {
        self.require_moderator(actor)?;
        validate_id(ban_id)?;
        self.suspension_repo.get_ban(ban_id).await
    }

    /// List ban records for a clan, most recent first.
    pub async fn list_bans(
        &self,
        actor: &Actor,
        clan_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<suspension_record::Model>> {
        self.require_moderator(actor)?;
        validate_id(clan_id)?;
        self.suspension_repo
            .list_bans_for_clan(clan_id, limit, offset)
            .await
    }

    /// Whether a clan currently has a ban in force.
    pub async fn is_banned(&self, clan_id: &str) -> AppResult<bool> {
        validate_id(clan_id)?;
        self.suspension_repo.is_banned(clan_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clanhub_db::entities::user::PlatformRole;

    fn moderator() -> Actor {
        Actor::with_role("01hq2xyzabcdefghjkmnpqrst0", PlatformRole::Moderator)
    }

    fn plain_user() -> Actor {
        Actor::user("01hq2xyzabcdefghjkmnpqrst1")
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> ModerationService {
        let db = std::sync::Arc::new(db);
        ModerationService::new(
            SuspensionRepository::new(db.clone()),
            UserRepository::new(db),
        )
    }

    #[tokio::test]
    async fn unprivileged_actor_cannot_impose_ban() {
        let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let err = service
            .impose_ban(
                &plain_user(),
                ImposeBanInput {
                    clan_id: "01hq2xyzabcdefghjkmnpqrst2".to_string(),
                    justification: "spam".to_string(),
                    permanent: false,
                    allow_appeal_at: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PERMISSIONS");
    }

    #[tokio::test]
    async fn malformed_clan_id_is_rejected_before_touching_the_db() {
        let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let err = service
            .impose_ban(
                &moderator(),
                ImposeBanInput {
                    clan_id: "not-a-ulid".to_string(),
                    justification: "spam".to_string(),
                    permanent: false,
                    allow_appeal_at: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_ID");
    }

    #[tokio::test]
    async fn oversized_justification_is_rejected() {
        let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let err = service
            .impose_ban(
                &moderator(),
                ImposeBanInput {
                    clan_id: "01hq2xyzabcdefghjkmnpqrst2".to_string(),
                    justification: "x".repeat(2001),
                    permanent: false,
                    allow_appeal_at: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn list_bans_pages_through_the_history() {
        let clan_id = "01hq2xyzabcdefghjkmnpqrst2";
        let record = |id: &str, status| suspension_record::Model {
            id: id.to_string(),
            clan_id: clan_id.to_string(),
            justification: "spam".to_string(),
            permanent: false,
            allow_appeal_at: None,
            status,
            issued_by: "01hq2xyzabcdefghjkmnpqrst3".to_string(),
            owner_key: "owner-key".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        };
        let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
            .append_query_results([[
                record("01hq2xyzabcdefghjkmnpqrst4", BanStatus::Active),
                record("01hq2xyzabcdefghjkmnpqrst5", BanStatus::Approved),
            ]])
            .into_connection();
        let service = service_with(db);

        let bans = service
            .list_bans(&moderator(), clan_id, 10, 0)
            .await
            .unwrap();
        assert_eq!(bans.len(), 2);
        assert_eq!(bans[0].status, BanStatus::Active);
    }

    #[tokio::test]
    async fn lifting_a_ban_settles_open_and_denied_appeals() {
        let clan_id = "01hq2xyzabcdefghjkmnpqrst2";
        let ban_id = "01hq2xyzabcdefghjkmnpqrst4";
        let ban = |status| suspension_record::Model {
            id: ban_id.to_string(),
            clan_id: clan_id.to_string(),
            justification: "spam".to_string(),
            permanent: false,
            allow_appeal_at: None,
            status,
            issued_by: "01hq2xyzabcdefghjkmnpqrst3".to_string(),
            owner_key: "owner-key".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        };
        let appeal = |id: &str, status| appeal_record::Model {
            id: id.to_string(),
            ban_id: ban_id.to_string(),
            clan_id: clan_id.to_string(),
            justification: "we cleaned up".to_string(),
            comments: None,
            allow_another_appeal: false,
            status,
            reviewed_by: None,
            created_at: Utc::now().into(),
            updated_at: None,
        };
        let suspended_clan = clan::Model {
            id: clan_id.to_string(),
            owner_id: "01hq2xyzabcdefghjkmnpqrst9".to_string(),
            name: "Test Clan".to_string(),
            description: None,
            visibility: clan::ClanVisibility::Visible,
            application_status: clan::ApplicationStatus::Open,
            suspended: true,
            created_at: Utc::now().into(),
            updated_at: None,
        };
        let lifted_clan = clan::Model {
            suspended: false,
            ..suspended_clan.clone()
        };

        // A denied appeal and a freshly submitted one both end up
        // approved when the ban is lifted directly.
        let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
            .append_query_results([[suspended_clan]])
            .append_query_results([[ban(BanStatus::Active)], [ban(BanStatus::Approved)]])
            .append_query_results([
                vec![
                    appeal("01hq2xyzabcdefghjkmnpqrst5", AppealStatus::Denied),
                    appeal("01hq2xyzabcdefghjkmnpqrst6", AppealStatus::Submitted),
                ],
                vec![appeal("01hq2xyzabcdefghjkmnpqrst5", AppealStatus::Approved)],
                vec![appeal("01hq2xyzabcdefghjkmnpqrst6", AppealStatus::Approved)],
            ])
            .append_query_results([[lifted_clan]])
            .into_connection();
        let service = service_with(db);

        let lifted = service.lift_ban(&moderator(), clan_id).await.unwrap();
        assert_eq!(lifted.status, BanStatus::Approved);
    }

    #[tokio::test]
    async fn empty_justification_is_rejected() {
        let db = sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let err = service
            .impose_ban(
                &moderator(),
                ImposeBanInput {
                    clan_id: "01hq2xyzabcdefghjkmnpqrst2".to_string(),
                    justification: "   ".to_string(),
                    permanent: false,
                    allow_appeal_at: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
