//! Suspension appeal workflow.
//!
//! Appeals run between the clan creator and platform staff: the creator
//! submits one appeal at a time against the active ban, staff review it,
//! and an approval lifts the ban.

use chrono::{DateTime, Utc};
use clanhub_common::{AppError, AppResult, IdGenerator, validate_id};
use clanhub_db::{
    entities::{
        Clan, SuspensionRecord, appeal_record,
        appeal_record::AppealStatus,
        clan, suspension_record,
        suspension_record::BanStatus,
    },
    repositories::{ClanRepository, SuspensionRepository},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use tracing::info;
use validator::Validate;

use super::{
    actor::Actor,
    audit::{AuditEvent, AuditSink, emit},
    authorizer::ClanRole,
};

/// Input for submitting an appeal against a ban.
#[derive(Validate)]
pub struct SubmitAppealInput {
    pub ban_id: String,
    #[validate(length(min = 1, max = 2000))]
    pub justification: String,
}

/// Input for reviewing an appeal.
///
/// `comments` follows the double-`Option` convention: `None` leaves the
/// stored comments untouched, `Some(None)` or `Some(Some(""))` clears
/// them, `Some(Some(text))` replaces them.
pub struct ReviewAppealInput {
    pub appeal_id: String,
    pub status: Option<AppealStatus>,
    pub comments: Option<Option<String>>,
    pub allow_another_appeal: Option<bool>,
}

/// Check whether a new appeal may be submitted against `ban`.
///
/// `appeals` must be the ban's appeal history ordered most recent first.
/// The ban itself must already be known to be in `Active` status.
pub fn check_appeal_eligibility(
    ban: &suspension_record::Model,
    appeals: &[appeal_record::Model],
    now: DateTime<Utc>,
) -> AppResult<()> {
    if ban.permanent {
        return Err(AppError::NotEligible(
            "Permanent suspensions cannot be appealed".to_string(),
        ));
    }
    if let Some(allow_at) = ban.allow_appeal_at {
        if now < allow_at.with_timezone(&Utc) {
            return Err(AppError::NotEligibleWaitCooldown);
        }
    }
    if appeals
        .iter()
        .any(|a| matches!(a.status, AppealStatus::Submitted | AppealStatus::InReview))
    {
        return Err(AppError::InReview);
    }
    if appeals.iter().any(|a| a.status == AppealStatus::Approved) {
        return Err(AppError::AppealApproved);
    }
    if let Some(latest) = appeals.first() {
        if latest.status == AppealStatus::Denied && !latest.allow_another_appeal {
            return Err(AppError::NotEligible(
                "Further appeals for this suspension are not allowed".to_string(),
            ));
        }
    }
    Ok(())
}

/// Fold a review decision into the stored appeal.
///
/// `comments` keeps the double-`Option` convention from
/// [`ReviewAppealInput`]; empty text clears the comments rather than
/// storing "".
fn merge_review_fields(
    appeal: appeal_record::Model,
    status: AppealStatus,
    comments: Option<Option<String>>,
    allow_another_appeal: Option<bool>,
    reviewer_id: &str,
) -> appeal_record::ActiveModel {
    let mut update: appeal_record::ActiveModel = appeal.into();
    update.status = Set(status);
    if let Some(comments) = comments {
        update.comments = Set(comments.filter(|c| !c.trim().is_empty()));
    }
    if let Some(allow) = allow_another_appeal {
        update.allow_another_appeal = Set(allow);
    }
    update.reviewed_by = Set(Some(reviewer_id.to_string()));
    update.updated_at = Set(Some(Utc::now().into()));
    update
}

/// Service driving the appeal lifecycle.
#[derive(Clone)]
pub struct AppealService {
    suspension_repo: SuspensionRepository,
    clan_repo: ClanRepository,
    id_gen: IdGenerator,
}

impl AppealService {
    /// Create a new appeal service.
    #[must_use]
    pub const fn new(suspension_repo: SuspensionRepository, clan_repo: ClanRepository) -> Self {
        Self {
            suspension_repo,
            clan_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit an appeal against an active ban. Only the clan creator may
    /// appeal, and only when the ban's eligibility conditions hold.
    pub async fn submit_appeal(
        &self,
        actor: &Actor,
        input: SubmitAppealInput,
    ) -> AppResult<appeal_record::Model> {
        validate_id(&input.ban_id)?;
        input.validate()?;

        let justification = input.justification.trim();
        if justification.is_empty() {
            return Err(AppError::Validation(
                "Appeal justification is required".to_string(),
            ));
        }

        let txn = self
            .suspension_repo
            .db()
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Lock the ban so concurrent submissions serialize on it.
        let ban = SuspensionRecord::find_by_id(&input.ban_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Suspension not found".to_string()))?;
        if ban.status != BanStatus::Active {
            return Err(AppError::NotFound(
                "This suspension is no longer in force".to_string(),
            ));
        }

        let role = self
            .clan_repo
            .get_member_role(&ban.clan_id, &actor.user_id)
            .await?;
        if ClanRole::from(role) != ClanRole::Creator {
            return Err(AppError::InvalidPermissions(
                "Only the clan creator can appeal a suspension".to_string(),
            ));
        }

        let appeals = appeal_record::Entity::find()
            .filter(appeal_record::Column::BanId.eq(ban.id.as_str()))
            .order_by_desc(appeal_record::Column::CreatedAt)
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        check_appeal_eligibility(&ban, &appeals, Utc::now())?;

        let appeal = appeal_record::ActiveModel {
            id: Set(self.id_gen.generate()),
            ban_id: Set(ban.id.clone()),
            clan_id: Set(ban.clan_id.clone()),
            justification: Set(justification.to_string()),
            comments: Set(None),
            allow_another_appeal: Set(true),
            status: Set(AppealStatus::Submitted),
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

        info!(appeal_id = %appeal.id, ban_id = %appeal.ban_id, "appeal submitted");
        Ok(appeal)
    }

    /// Submit an appeal and publish an audit event.
    pub async fn submit_appeal_audited(
        &self,
        actor: &Actor,
        input: SubmitAppealInput,
        sink: &dyn AuditSink,
    ) -> AppResult<appeal_record::Model> {
        let appeal = self.submit_appeal(actor, input).await?;
        emit(
            sink,
            AuditEvent::AppealSubmitted {
                appeal_id: appeal.id.clone(),
                ban_id: appeal.ban_id.clone(),
            },
        )
        .await;
        Ok(appeal)
    }

    /// Review an appeal: move it to `InReview`, or settle it as
    /// `Approved` (which also lifts the ban) or `Denied`.
    ///
    /// A settled appeal can never be reopened or re-settled.
    pub async fn review_appeal(
        &self,
        actor: &Actor,
        input: ReviewAppealInput,
    ) -> AppResult<appeal_record::Model> {
        if !actor.platform_role.can_moderate() {
            return Err(AppError::InvalidPermissions(
                "Only platform moderators can review appeals".to_string(),
            ));
        }
        validate_id(&input.appeal_id)?;
        if input.status == Some(AppealStatus::Submitted) {
            return Err(AppError::Validation(
                "An appeal cannot be moved back to submitted".to_string(),
            ));
        }

        let txn = self
            .suspension_repo
            .db()
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let appeal = appeal_record::Entity::find_by_id(&input.appeal_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Appeal not found".to_string()))?;
        if appeal.status.is_final() {
            return Err(AppError::AppealAlreadyFinal);
        }

        let new_status = input.status.unwrap_or(appeal.status);
        let ban_id = appeal.ban_id.clone();
        let clan_id = appeal.clan_id.clone();

        let update = merge_review_fields(
            appeal,
            new_status,
            input.comments,
            input.allow_another_appeal,
            &actor.user_id,
        );
        let appeal = update
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Approval lifts the ban in the same transaction. A denial
        // leaves the ban in force untouched.
        if new_status == AppealStatus::Approved {
            let ban = SuspensionRecord::find_by_id(&ban_id)
                .lock_exclusive()
                .one(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .ok_or_else(|| AppError::NotFound("Suspension not found".to_string()))?;
            let mut ban_update: suspension_record::ActiveModel = ban.into();
            ban_update.status = Set(BanStatus::Approved);
            ban_update.updated_at = Set(Some(Utc::now().into()));
            ban_update
                .update(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            let clan = Clan::find_by_id(&clan_id)
                .one(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .ok_or_else(|| AppError::NotFound("Clan not found".to_string()))?;
            let mut clan_update: clan::ActiveModel = clan.into();
            clan_update.suspended = Set(false);
            clan_update.updated_at = Set(Some(Utc::now().into()));
            clan_update
                .update(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(appeal_id = %appeal.id, status = ?appeal.status, "appeal reviewed");
        Ok(appeal)
    }

    /// Review an appeal and publish an audit event.
    pub async fn review_appeal_audited(
        &self,
        actor: &Actor,
        input: ReviewAppealInput,
        sink: &dyn AuditSink,
    ) -> AppResult<appeal_record::Model> {
        let appeal = self.review_appeal(actor, input).await?;
        emit(
            sink,
            AuditEvent::AppealReviewed {
                appeal_id: appeal.id.clone(),
                status: format!("{:?}", appeal.status).to_lowercase(),
            },
        )
        .await;
        Ok(appeal)
    }

    /// Re-open appeal eligibility on a denied appeal.
    ///
    /// A settled appeal is otherwise immutable; this is the one
    /// privileged override, flipping `allow_another_appeal` so the clan
    /// creator may submit a fresh appeal.
    pub async fn reopen_eligibility(
        &self,
        actor: &Actor,
        appeal_id: &str,
    ) -> AppResult<appeal_record::Model> {
        if !actor.platform_role.can_moderate() {
            return Err(AppError::InvalidPermissions(
                "Only platform moderators can re-open appeal eligibility".to_string(),
            ));
        }
        validate_id(appeal_id)?;

        let txn = self
            .suspension_repo
            .db()
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let appeal = appeal_record::Entity::find_by_id(appeal_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Appeal not found".to_string()))?;
        if appeal.status != AppealStatus::Denied {
            return Err(AppError::NotFound(
                "Only a denied appeal can have its eligibility re-opened".to_string(),
            ));
        }

        let mut update: appeal_record::ActiveModel = appeal.into();
        update.allow_another_appeal = Set(true);
        update.updated_at = Set(Some(Utc::now().into()));
        let appeal = update
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        info!(appeal_id = %appeal.id, "appeal eligibility re-opened");
        Ok(appeal)
    }

    /// Get an appeal by ID.
    pub async fn get_appeal(&self, id: &str) -> AppResult<appeal_record::Model> {
        validate_id(id)?;
        self.suspension_repo.get_appeal(id).await
    }

    /// List appeals filed on behalf of a clan, most recent first.
    pub async fn list_appeals(
        &self,
        clan_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<appeal_record::Model>> {
        validate_id(clan_id)?;
        self.suspension_repo
            .list_appeals_for_clan(clan_id, limit, offset)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ban(permanent: bool, allow_appeal_at: Option<DateTime<Utc>>) -> suspension_record::Model {
        suspension_record::Model {
            id: "01hq2xyzabcdefghjkmnpqrst0".to_string(),
            clan_id: "01hq2xyzabcdefghjkmnpqrst1".to_string(),
            justification: "spam".to_string(),
            permanent,
            allow_appeal_at: allow_appeal_at.map(Into::into),
            status: BanStatus::Active,
            issued_by: "01hq2xyzabcdefghjkmnpqrst2".to_string(),
            owner_key: "owner-key".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn appeal(status: AppealStatus, allow_another: bool) -> appeal_record::Model {
        appeal_record::Model {
            id: "01hq2xyzabcdefghjkmnpqrst3".to_string(),
            ban_id: "01hq2xyzabcdefghjkmnpqrst0".to_string(),
            clan_id: "01hq2xyzabcdefghjkmnpqrst1".to_string(),
            justification: "we cleaned up".to_string(),
            comments: None,
            allow_another_appeal: allow_another,
            status,
            reviewed_by: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn permanent_ban_is_never_appealable() {
        let err = check_appeal_eligibility(&ban(true, None), &[], Utc::now()).unwrap_err();
        assert_eq!(err.error_code(), "NOT_ELIGIBLE");
    }

    #[test]
    fn permanent_wins_over_cooldown() {
        // A permanent ban with a stale appeal window still reports
        // NOT_ELIGIBLE, not the cooldown code.
        let future = Utc::now() + Duration::hours(4);
        let err = check_appeal_eligibility(&ban(true, Some(future)), &[], Utc::now()).unwrap_err();
        assert_eq!(err.error_code(), "NOT_ELIGIBLE");
    }

    #[test]
    fn cooldown_not_elapsed_is_rejected() {
        let future = Utc::now() + Duration::hours(4);
        let err = check_appeal_eligibility(&ban(false, Some(future)), &[], Utc::now()).unwrap_err();
        assert_eq!(err.error_code(), "NOT_ELIGIBLE_WAIT_COOLDOWN");
    }

    #[test]
    fn elapsed_cooldown_allows_appeal() {
        let past = Utc::now() - Duration::hours(4);
        check_appeal_eligibility(&ban(false, Some(past)), &[], Utc::now())
            .unwrap_or_else(|e| panic!("expected eligible, got {e}"));
    }

    #[test]
    fn no_cooldown_means_immediately_appealable() {
        check_appeal_eligibility(&ban(false, None), &[], Utc::now())
            .unwrap_or_else(|e| panic!("expected eligible, got {e}"));
    }

    #[test]
    fn open_appeal_blocks_another() {
        for status in [AppealStatus::Submitted, AppealStatus::InReview] {
            let err =
                check_appeal_eligibility(&ban(false, None), &[appeal(status, true)], Utc::now())
                    .unwrap_err();
            assert_eq!(err.error_code(), "IN_REVIEW");
        }
    }

    #[test]
    fn approved_appeal_blocks_another() {
        let err = check_appeal_eligibility(
            &ban(false, None),
            &[appeal(AppealStatus::Approved, true)],
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "APPEAL_APPROVED");
    }

    #[test]
    fn denial_with_permission_allows_another() {
        check_appeal_eligibility(
            &ban(false, None),
            &[appeal(AppealStatus::Denied, true)],
            Utc::now(),
        )
        .unwrap_or_else(|e| panic!("expected eligible, got {e}"));
    }

    #[test]
    fn denial_without_permission_blocks_another() {
        let err = check_appeal_eligibility(
            &ban(false, None),
            &[appeal(AppealStatus::Denied, false)],
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "NOT_ELIGIBLE");
    }

    #[tokio::test]
    async fn reviewing_a_settled_appeal_always_fails() {
        use clanhub_db::entities::user::PlatformRole;
        use sea_orm::{DatabaseBackend, MockDatabase};
        use std::sync::Arc;

        for status in [AppealStatus::Approved, AppealStatus::Denied] {
            let settled = appeal(status, false);
            let db = Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([[settled]])
                    .into_connection(),
            );
            let service = AppealService::new(
                SuspensionRepository::new(db.clone()),
                ClanRepository::new(db),
            );
            let moderator =
                Actor::with_role("01hq2xyzabcdefghjkmnpqrst7", PlatformRole::Moderator);

            let err = service
                .review_appeal(
                    &moderator,
                    ReviewAppealInput {
                        appeal_id: "01hq2xyzabcdefghjkmnpqrst3".to_string(),
                        status: Some(AppealStatus::Denied),
                        comments: None,
                        allow_another_appeal: None,
                    },
                )
                .await
                .unwrap_err();
            assert_eq!(err.error_code(), "APPEAL_ALREADY_FINAL");
        }
    }

    #[tokio::test]
    async fn list_appeals_pages_through_the_history() {
        use sea_orm::{DatabaseBackend, MockDatabase};
        use std::sync::Arc;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    appeal(AppealStatus::Denied, true),
                    appeal(AppealStatus::Approved, true),
                ]])
                .into_connection(),
        );
        let service = AppealService::new(
            SuspensionRepository::new(db.clone()),
            ClanRepository::new(db),
        );

        let appeals = service
            .list_appeals("01hq2xyzabcdefghjkmnpqrst1", 10, 0)
            .await
            .unwrap();
        assert_eq!(appeals.len(), 2);
    }

    #[test]
    fn omitted_review_comments_are_left_untouched() {
        use sea_orm::ActiveValue;

        let mut existing = appeal(AppealStatus::Submitted, false);
        existing.comments = Some("first pass notes".to_string());
        let update = merge_review_fields(
            existing,
            AppealStatus::InReview,
            None,
            None,
            "01hq2xyzabcdefghjkmnpqrst7",
        );
        assert!(matches!(
            update.comments,
            ActiveValue::Unchanged(Some(ref c)) if c == "first pass notes"
        ));
        assert!(matches!(
            update.allow_another_appeal,
            ActiveValue::Unchanged(false)
        ));
    }

    #[test]
    fn clearing_review_comments_stores_none() {
        use sea_orm::ActiveValue;

        // An explicit null, an empty string and whitespace all clear
        // the stored comments.
        for cleared in [None, Some(String::new()), Some("   ".to_string())] {
            let mut existing = appeal(AppealStatus::Submitted, false);
            existing.comments = Some("first pass notes".to_string());
            let update = merge_review_fields(
                existing,
                AppealStatus::Denied,
                Some(cleared),
                None,
                "01hq2xyzabcdefghjkmnpqrst7",
            );
            assert!(matches!(update.comments, ActiveValue::Set(None)));
        }
    }

    #[test]
    fn replacing_review_comments_stores_the_text() {
        use sea_orm::ActiveValue;

        let update = merge_review_fields(
            appeal(AppealStatus::Submitted, false),
            AppealStatus::Denied,
            Some(Some("raid logs checked".to_string())),
            Some(true),
            "01hq2xyzabcdefghjkmnpqrst7",
        );
        assert!(matches!(
            update.comments,
            ActiveValue::Set(Some(ref c)) if c == "raid logs checked"
        ));
        assert!(matches!(update.allow_another_appeal, ActiveValue::Set(true)));
        assert!(matches!(
            update.reviewed_by,
            ActiveValue::Set(Some(ref r)) if r == "01hq2xyzabcdefghjkmnpqrst7"
        ));
    }

    #[tokio::test]
    async fn approving_an_appeal_lifts_the_ban_and_unsuspends_the_clan() {
        use clanhub_db::entities::user::PlatformRole;
        use sea_orm::{DatabaseBackend, MockDatabase};
        use std::sync::Arc;

        let mut approved = appeal(AppealStatus::Approved, false);
        approved.reviewed_by = Some("01hq2xyzabcdefghjkmnpqrst7".to_string());
        let mut lifted_ban = ban(false, None);
        lifted_ban.status = BanStatus::Approved;
        let suspended_clan = clan::Model {
            id: "01hq2xyzabcdefghjkmnpqrst1".to_string(),
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

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[appeal(AppealStatus::Submitted, false)], [approved]])
                .append_query_results([[ban(false, None)], [lifted_ban]])
                .append_query_results([[suspended_clan], [lifted_clan]])
                .into_connection(),
        );
        let service = AppealService::new(
            SuspensionRepository::new(db.clone()),
            ClanRepository::new(db),
        );
        let moderator = Actor::with_role("01hq2xyzabcdefghjkmnpqrst7", PlatformRole::Moderator);

        let reviewed = service
            .review_appeal(
                &moderator,
                ReviewAppealInput {
                    appeal_id: "01hq2xyzabcdefghjkmnpqrst3".to_string(),
                    status: Some(AppealStatus::Approved),
                    comments: None,
                    allow_another_appeal: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(reviewed.status, AppealStatus::Approved);
        assert_eq!(reviewed.reviewed_by.as_deref(), Some("01hq2xyzabcdefghjkmnpqrst7"));
    }

    #[tokio::test]
    async fn reopening_a_denied_appeal_allows_a_fresh_one() {
        use clanhub_db::entities::user::PlatformRole;
        use sea_orm::{DatabaseBackend, MockDatabase};
        use std::sync::Arc;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    [appeal(AppealStatus::Denied, false)],
                    [appeal(AppealStatus::Denied, true)],
                ])
                .into_connection(),
        );
        let service = AppealService::new(
            SuspensionRepository::new(db.clone()),
            ClanRepository::new(db),
        );
        let moderator = Actor::with_role("01hq2xyzabcdefghjkmnpqrst7", PlatformRole::Moderator);

        let reopened = service
            .reopen_eligibility(&moderator, "01hq2xyzabcdefghjkmnpqrst3")
            .await
            .unwrap();
        assert!(reopened.allow_another_appeal);
    }

    #[tokio::test]
    async fn reopening_an_unsettled_appeal_is_not_found() {
        use clanhub_db::entities::user::PlatformRole;
        use sea_orm::{DatabaseBackend, MockDatabase};
        use std::sync::Arc;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[appeal(AppealStatus::Submitted, false)]])
                .into_connection(),
        );
        let service = AppealService::new(
            SuspensionRepository::new(db.clone()),
            ClanRepository::new(db),
        );
        let moderator = Actor::with_role("01hq2xyzabcdefghjkmnpqrst7", PlatformRole::Moderator);

        let err = service
            .reopen_eligibility(&moderator, "01hq2xyzabcdefghjkmnpqrst3")
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn latest_denial_decides_when_history_has_several() {
        // Oldest appeal forbade further attempts, but a later one
        // allowed them again. Most recent verdict wins.
        let mut older = appeal(AppealStatus::Denied, false);
        older.created_at = (Utc::now() - Duration::days(2)).into();
        let newer = appeal(AppealStatus::Denied, true);
        check_appeal_eligibility(&ban(false, None), &[newer, older], Utc::now())
            .unwrap_or_else(|e| panic!("expected eligible, got {e}"));
    }
}
