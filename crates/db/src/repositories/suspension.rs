//! Suspension repository: clan ban records and their appeals.

use std::sync::Arc;

use clanhub_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{
    AppealRecord, SuspensionRecord, appeal_record,
    appeal_record::AppealStatus,
    suspension_record,
    suspension_record::BanStatus,
};

/// Repository for suspension records and appeal records.
///
/// The impose/lift/review transitions touch several entities at once and
/// run as transactions in the core services through [`Self::db`]; this
/// repository carries the read paths.
#[derive(Clone)]
pub struct SuspensionRepository {
    db: Arc<DatabaseConnection>,
}

impl SuspensionRepository {
    /// Create a new suspension repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get reference to the database connection.
    pub fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    // ==================== Suspension Records ====================

    /// Get a suspension record by ID.
    pub async fn get_ban(&self, id: &str) -> AppResult<suspension_record::Model> {
        SuspensionRecord::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Suspension record not found: {id}")))
    }

    /// Find the Active suspension record for a clan, if any.
    ///
    /// Only an Active record counts as "currently banned"; historical
    /// records with other statuses are never revisited here.
    pub async fn find_active_ban(
        &self,
        clan_id: &str,
    ) -> AppResult<Option<suspension_record::Model>> {
        SuspensionRecord::find()
            .filter(suspension_record::Column::ClanId.eq(clan_id))
            .filter(suspension_record::Column::Status.eq(BanStatus::Active))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether a clan currently has an Active suspension record.
    pub async fn is_banned(&self, clan_id: &str) -> AppResult<bool> {
        Ok(self.find_active_ban(clan_id).await?.is_some())
    }

    /// List suspension records for a clan, most recent first.
    pub async fn list_bans_for_clan(
        &self,
        clan_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<suspension_record::Model>> {
        SuspensionRecord::find()
            .filter(suspension_record::Column::ClanId.eq(clan_id))
            .order_by(suspension_record::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ==================== Appeal Records ====================

    /// Get an appeal record by ID.
    pub async fn get_appeal(&self, id: &str) -> AppResult<appeal_record::Model> {
        AppealRecord::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Appeal not found: {id}")))
    }

    /// Find the open (Submitted or `InReview`) appeal for a ban, if any.
    pub async fn find_open_appeal(&self, ban_id: &str) -> AppResult<Option<appeal_record::Model>> {
        AppealRecord::find()
            .filter(appeal_record::Column::BanId.eq(ban_id))
            .filter(
                appeal_record::Column::Status
                    .eq(AppealStatus::Submitted)
                    .or(appeal_record::Column::Status.eq(AppealStatus::InReview)),
            )
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the most recent appeal for a ban, if any.
    pub async fn find_latest_appeal(
        &self,
        ban_id: &str,
    ) -> AppResult<Option<appeal_record::Model>> {
        AppealRecord::find()
            .filter(appeal_record::Column::BanId.eq(ban_id))
            .order_by(appeal_record::Column::CreatedAt, Order::Desc)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List appeals for a clan, most recent first.
    pub async fn list_appeals_for_clan(
        &self,
        clan_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<appeal_record::Model>> {
        AppealRecord::find()
            .filter(appeal_record::Column::ClanId.eq(clan_id))
            .order_by(appeal_record::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
