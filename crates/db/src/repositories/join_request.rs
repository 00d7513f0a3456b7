//! Join request repository.

use std::sync::Arc;

use clanhub_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{JoinRequest, join_request, join_request::JoinRequestStatus};

/// Repository for join requests.
#[derive(Clone)]
pub struct JoinRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl JoinRequestRepository {
    /// Create a new join request repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get reference to the database connection.
    pub fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// Get a join request by ID.
    pub async fn get_by_id(&self, id: &str) -> AppResult<join_request::Model> {
        JoinRequest::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Join request not found: {id}")))
    }

    /// Find the Submitted request for a user in a clan, if any.
    pub async fn find_open_request(
        &self,
        clan_id: &str,
        user_id: &str,
    ) -> AppResult<Option<join_request::Model>> {
        JoinRequest::find()
            .filter(join_request::Column::ClanId.eq(clan_id))
            .filter(join_request::Column::UserId.eq(user_id))
            .filter(join_request::Column::Status.eq(JoinRequestStatus::Submitted))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the most recent request for a user in a clan, if any.
    ///
    /// Only the most recent non-Approved record is actionable; a Denied
    /// one with `allow_another_application == false` blocks new requests.
    pub async fn find_latest_request(
        &self,
        clan_id: &str,
        user_id: &str,
    ) -> AppResult<Option<join_request::Model>> {
        JoinRequest::find()
            .filter(join_request::Column::ClanId.eq(clan_id))
            .filter(join_request::Column::UserId.eq(user_id))
            .order_by(join_request::Column::CreatedAt, Order::Desc)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List pending requests for a clan, oldest first.
    pub async fn list_pending_for_clan(
        &self,
        clan_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<join_request::Model>> {
        JoinRequest::find()
            .filter(join_request::Column::ClanId.eq(clan_id))
            .filter(join_request::Column::Status.eq(JoinRequestStatus::Submitted))
            .order_by(join_request::Column::CreatedAt, Order::Asc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn test_request(
        id: &str,
        status: JoinRequestStatus,
        allow_another: bool,
    ) -> join_request::Model {
        join_request::Model {
            id: id.to_string(),
            clan_id: "clan1".to_string(),
            user_id: "user1".to_string(),
            message: None,
            status,
            allow_another_application: allow_another,
            reviewed_by: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_open_request() {
        let req = test_request("req1", JoinRequestStatus::Submitted, true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[req]])
                .into_connection(),
        );

        let repo = JoinRequestRepository::new(db);
        let found = repo.find_open_request("clan1", "user1").await.unwrap();

        assert!(found.is_some());
        assert!(found.unwrap().status.is_pending());
    }

    #[tokio::test]
    async fn test_find_latest_request_blocking() {
        let req = test_request("req2", JoinRequestStatus::Denied, false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[req]])
                .into_connection(),
        );

        let repo = JoinRequestRepository::new(db);
        let found = repo.find_latest_request("clan1", "user1").await.unwrap().unwrap();

        assert!(!found.allow_another_application);
    }
}
