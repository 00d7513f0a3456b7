//! Join request gate: how outside users become clan members.

use chrono::Utc;
use clanhub_common::{AppError, AppResult, IdGenerator, validate_id};
use clanhub_db::{
    entities::{
        Clan, JoinRequest,
        clan::ApplicationStatus,
        clan_member, join_request,
        join_request::JoinRequestStatus,
    },
    repositories::{ClanRepository, JoinRequestRepository},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use tracing::info;

use super::{
    actor::Actor,
    audit::{AuditEvent, AuditSink, emit},
    authorizer::ClanRole,
};

/// Input for rejecting a join request.
pub struct RejectJoinRequestInput {
    pub request_id: String,
    /// Whether the applicant may apply again later. `false` blocks
    /// further applications until an unblock.
    pub allow_another_application: bool,
}

/// Service driving the join request workflow.
#[derive(Clone)]
pub struct JoinRequestService {
    join_repo: JoinRequestRepository,
    clan_repo: ClanRepository,
    id_gen: IdGenerator,
}

impl JoinRequestService {
    /// Create a new join request service.
    #[must_use]
    pub const fn new(join_repo: JoinRequestRepository, clan_repo: ClanRepository) -> Self {
        Self {
            join_repo,
            clan_repo,
            id_gen: IdGenerator::new(),
        }
    }

    async fn require_reviewer(&self, actor: &Actor, clan_id: &str) -> AppResult<()> {
        let role = ClanRole::from(
            self.clan_repo
                .get_member_role(clan_id, &actor.user_id)
                .await?,
        );
        if !role.can_review_applications() {
            return Err(AppError::InvalidPermissions(
                "Only clan staff can review join requests".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply to join a clan.
    pub async fn apply(
        &self,
        actor: &Actor,
        clan_id: &str,
        message: Option<String>,
    ) -> AppResult<join_request::Model> {
        validate_id(clan_id)?;
        if let Some(message) = &message {
            if message.len() > 1000 {
                return Err(AppError::Validation(
                    "Application message too long".to_string(),
                ));
            }
        }

        let txn = self
            .join_repo
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
        if clan.suspended {
            return Err(AppError::NotEligible(
                "This clan is suspended and cannot accept applications".to_string(),
            ));
        }
        if clan.application_status == ApplicationStatus::Closed {
            return Err(AppError::NotEligible(
                "This clan is not accepting applications".to_string(),
            ));
        }

        let existing_member = clan_member::Entity::find()
            .filter(clan_member::Column::ClanId.eq(clan_id))
            .filter(clan_member::Column::UserId.eq(actor.user_id.as_str()))
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if existing_member.is_some() {
            return Err(AppError::Conflict(
                "User is already a member of this clan".to_string(),
            ));
        }

        let latest = JoinRequest::find()
            .filter(join_request::Column::ClanId.eq(clan_id))
            .filter(join_request::Column::UserId.eq(actor.user_id.as_str()))
            .order_by_desc(join_request::Column::CreatedAt)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if let Some(latest) = latest {
            if latest.status == JoinRequestStatus::Submitted {
                return Err(AppError::InReview);
            }
            if latest.status == JoinRequestStatus::Denied && !latest.allow_another_application {
                return Err(AppError::NotEligible(
                    "Further applications to this clan are not allowed".to_string(),
                ));
            }
        }

        let request = join_request::ActiveModel {
            id: Set(self.id_gen.generate()),
            clan_id: Set(clan_id.to_string()),
            user_id: Set(actor.user_id.clone()),
            message: Set(message.filter(|m| !m.trim().is_empty())),
            status: Set(JoinRequestStatus::Submitted),
            allow_another_application: Set(true),
            reviewed_by: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(clan_id = %request.clan_id, user_id = %request.user_id, "join request submitted");
        Ok(request)
    }

    /// Apply and publish an audit event.
    pub async fn apply_audited(
        &self,
        actor: &Actor,
        clan_id: &str,
        message: Option<String>,
        sink: &dyn AuditSink,
    ) -> AppResult<join_request::Model> {
        let request = self.apply(actor, clan_id, message).await?;
        emit(
            sink,
            AuditEvent::JoinApplied {
                clan_id: request.clan_id.clone(),
                user_id: request.user_id.clone(),
            },
        )
        .await;
        Ok(request)
    }

    /// Approve a join request and create the membership, atomically.
    pub async fn approve(
        &self,
        actor: &Actor,
        request_id: &str,
    ) -> AppResult<join_request::Model> {
        validate_id(request_id)?;

        let request = self.join_repo.get_by_id(request_id).await?;
        self.require_reviewer(actor, &request.clan_id).await?;

        let txn = self
            .join_repo
            .db()
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let request = JoinRequest::find_by_id(request_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Join request not found".to_string()))?;
        if request.status != JoinRequestStatus::Submitted {
            return Err(AppError::Conflict(
                "Join request has already been reviewed".to_string(),
            ));
        }

        let clan_id = request.clan_id.clone();
        let user_id = request.user_id.clone();

        let mut update: join_request::ActiveModel = request.into();
        update.status = Set(JoinRequestStatus::Approved);
        update.reviewed_by = Set(Some(actor.user_id.clone()));
        update.updated_at = Set(Some(Utc::now().into()));
        let request = update
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        clan_member::ActiveModel {
            id: Set(self.id_gen.generate()),
            clan_id: Set(clan_id),
            user_id: Set(user_id),
            suspended: Set(false),
            joined_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(clan_id = %request.clan_id, user_id = %request.user_id, "join request approved");
        Ok(request)
    }

    /// Approve a join request and publish an audit event.
    pub async fn approve_audited(
        &self,
        actor: &Actor,
        request_id: &str,
        sink: &dyn AuditSink,
    ) -> AppResult<join_request::Model> {
        let request = self.approve(actor, request_id).await?;
        emit(
            sink,
            AuditEvent::JoinApproved {
                clan_id: request.clan_id.clone(),
                user_id: request.user_id.clone(),
            },
        )
        .await;
        Ok(request)
    }

    /// Reject a join request, optionally blocking further applications.
    pub async fn reject(
        &self,
        actor: &Actor,
        input: RejectJoinRequestInput,
    ) -> AppResult<join_request::Model> {
        validate_id(&input.request_id)?;

        let request = self.join_repo.get_by_id(&input.request_id).await?;
        self.require_reviewer(actor, &request.clan_id).await?;

        let txn = self
            .join_repo
            .db()
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Decided under the row lock so a concurrent approval wins or
        // loses cleanly, never both.
        let request = JoinRequest::find_by_id(&input.request_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Join request not found".to_string()))?;
        if request.status != JoinRequestStatus::Submitted {
            return Err(AppError::Conflict(
                "Join request has already been reviewed".to_string(),
            ));
        }

        let mut update: join_request::ActiveModel = request.into();
        update.status = Set(JoinRequestStatus::Denied);
        update.allow_another_application = Set(input.allow_another_application);
        update.reviewed_by = Set(Some(actor.user_id.clone()));
        update.updated_at = Set(Some(Utc::now().into()));
        let request = update
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(clan_id = %request.clan_id, user_id = %request.user_id, "join request rejected");
        Ok(request)
    }

    /// Reject a join request and publish an audit event.
    pub async fn reject_audited(
        &self,
        actor: &Actor,
        input: RejectJoinRequestInput,
        sink: &dyn AuditSink,
    ) -> AppResult<join_request::Model> {
        let request = self.reject(actor, input).await?;
        emit(
            sink,
            AuditEvent::JoinRejected {
                clan_id: request.clan_id.clone(),
                user_id: request.user_id.clone(),
            },
        )
        .await;
        Ok(request)
    }

    /// Unblock an applicant whose latest denial forbade re-applying.
    ///
    /// Retroactively sets `allow_another_application` on the blocking
    /// record; `NOT_FOUND` when nothing blocks the user.
    pub async fn unblock(
        &self,
        actor: &Actor,
        clan_id: &str,
        user_id: &str,
    ) -> AppResult<join_request::Model> {
        validate_id(clan_id)?;
        validate_id(user_id)?;
        self.require_reviewer(actor, clan_id).await?;

        let latest = self
            .join_repo
            .find_latest_request(clan_id, user_id)
            .await?
            .filter(|r| r.status == JoinRequestStatus::Denied && !r.allow_another_application)
            .ok_or_else(|| {
                AppError::NotFound("User is not blocked from applying".to_string())
            })?;

        let mut update: join_request::ActiveModel = latest.into();
        update.allow_another_application = Set(true);
        update.updated_at = Set(Some(Utc::now().into()));
        let request = update
            .update(self.join_repo.db())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(clan_id = %request.clan_id, user_id = %request.user_id, "applicant unblocked");
        Ok(request)
    }

    /// Unblock an applicant and publish an audit event.
    pub async fn unblock_audited(
        &self,
        actor: &Actor,
        clan_id: &str,
        user_id: &str,
        sink: &dyn AuditSink,
    ) -> AppResult<join_request::Model> {
        let request = self.unblock(actor, clan_id, user_id).await?;
        emit(
            sink,
            AuditEvent::JoinUnblocked {
                clan_id: request.clan_id.clone(),
                user_id: request.user_id.clone(),
            },
        )
        .await;
        Ok(request)
    }

    /// List pending join requests for a clan, oldest first.
    pub async fn list_pending(
        &self,
        actor: &Actor,
        clan_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<join_request::Model>> {
        validate_id(clan_id)?;
        self.require_reviewer(actor, clan_id).await?;
        self.join_repo
            .list_pending_for_clan(clan_id, limit, offset)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clanhub_db::entities::clan;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    const CLAN: &str = "01hq2xyzabcdefghjkmnpqrst0";
    const APPLICANT: &str = "01hq2xyzabcdefghjkmnpqrst1";

    fn test_clan(suspended: bool, application_status: ApplicationStatus) -> clan::Model {
        clan::Model {
            id: CLAN.to_string(),
            owner_id: "01hq2xyzabcdefghjkmnpqrst9".to_string(),
            name: "Test Clan".to_string(),
            description: None,
            visibility: clan::ClanVisibility::Visible,
            application_status,
            suspended,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> JoinRequestService {
        let db = Arc::new(db);
        JoinRequestService::new(
            JoinRequestRepository::new(db.clone()),
            ClanRepository::new(db),
        )
    }

    #[tokio::test]
    async fn applying_to_a_suspended_clan_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_clan(true, ApplicationStatus::Open)]])
            .into_connection();
        let service = service_with(db);

        let err = service
            .apply(&Actor::user(APPLICANT), CLAN, None)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_ELIGIBLE");
    }

    #[tokio::test]
    async fn applying_to_a_closed_clan_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_clan(false, ApplicationStatus::Closed)]])
            .into_connection();
        let service = service_with(db);

        let err = service
            .apply(&Actor::user(APPLICANT), CLAN, None)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_ELIGIBLE");
    }

    #[tokio::test]
    async fn open_request_blocks_another_application() {
        let pending = join_request::Model {
            id: "01hq2xyzabcdefghjkmnpqrst5".to_string(),
            clan_id: CLAN.to_string(),
            user_id: APPLICANT.to_string(),
            message: None,
            status: JoinRequestStatus::Submitted,
            allow_another_application: true,
            reviewed_by: None,
            created_at: Utc::now().into(),
            updated_at: None,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_clan(false, ApplicationStatus::Open)]])
            .append_query_results([Vec::<clan_member::Model>::new()])
            .append_query_results([[pending]])
            .into_connection();
        let service = service_with(db);

        let err = service
            .apply(&Actor::user(APPLICANT), CLAN, None)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "IN_REVIEW");
    }

    #[tokio::test]
    async fn rejecting_a_concurrently_approved_request_is_a_conflict() {
        use clanhub_db::entities::staff_assignment::{self, StaffRole};

        let reviewer_id = "01hq2xyzabcdefghjkmnpqrst8";
        let request = |status| join_request::Model {
            id: "01hq2xyzabcdefghjkmnpqrst5".to_string(),
            clan_id: CLAN.to_string(),
            user_id: APPLICANT.to_string(),
            message: None,
            status,
            allow_another_application: true,
            reviewed_by: None,
            created_at: Utc::now().into(),
            updated_at: None,
        };
        let reviewer_member = clan_member::Model {
            id: "01hq2xyzabcdefghjkmnpqrst6".to_string(),
            clan_id: CLAN.to_string(),
            user_id: reviewer_id.to_string(),
            suspended: false,
            joined_at: Utc::now().into(),
            updated_at: None,
        };
        let reviewer_role = staff_assignment::Model {
            id: "01hq2xyzabcdefghjkmnpqrst7".to_string(),
            member_id: reviewer_member.id.clone(),
            clan_id: CLAN.to_string(),
            role: StaffRole::Moderator,
            assigned_at: Utc::now().into(),
        };
        // The pre-check sees the request Submitted; by the time the row
        // lock is taken another reviewer has approved it.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[request(JoinRequestStatus::Submitted)]])
            .append_query_results([[(reviewer_member, Some(reviewer_role))]])
            .append_query_results([[request(JoinRequestStatus::Approved)]])
            .into_connection();
        let service = service_with(db);

        let err = service
            .reject(
                &Actor::user(reviewer_id),
                RejectJoinRequestInput {
                    request_id: "01hq2xyzabcdefghjkmnpqrst5".to_string(),
                    allow_another_application: true,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFLICT");
    }

    #[tokio::test]
    async fn blocked_applicant_is_rejected() {
        let denied = join_request::Model {
            id: "01hq2xyzabcdefghjkmnpqrst5".to_string(),
            clan_id: CLAN.to_string(),
            user_id: APPLICANT.to_string(),
            message: None,
            status: JoinRequestStatus::Denied,
            allow_another_application: false,
            reviewed_by: Some("01hq2xyzabcdefghjkmnpqrst9".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_clan(false, ApplicationStatus::Open)]])
            .append_query_results([Vec::<clan_member::Model>::new()])
            .append_query_results([[denied]])
            .into_connection();
        let service = service_with(db);

        let err = service
            .apply(&Actor::user(APPLICANT), CLAN, None)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_ELIGIBLE");
    }
}
