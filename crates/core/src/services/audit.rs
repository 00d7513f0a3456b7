//! Audit event sink.
//!
//! Every state transition produces one event for downstream display and
//! audit trails. Delivery is fire-and-forget: events are published after
//! the owning transaction commits, and a failing sink never rolls the
//! transition back.

use async_trait::async_trait;
use clanhub_common::AppResult;

/// One audit event per engine state transition.
#[derive(Debug, Clone)]
pub enum AuditEvent {
    /// A clan-wide suspension was imposed.
    BanImposed { clan_id: String, ban_id: String },
    /// A clan-wide suspension was lifted by platform staff.
    BanLifted { clan_id: String },
    /// The clan creator submitted a suspension appeal.
    AppealSubmitted { appeal_id: String, ban_id: String },
    /// Platform staff reviewed an appeal.
    AppealReviewed { appeal_id: String, status: String },
    /// A member was suspended within a clan.
    MemberSuspended { clan_id: String, user_id: String },
    /// A member's suspension was lifted.
    MemberUnsuspended { clan_id: String, user_id: String },
    /// A member was expelled from a clan.
    MemberExpelled { clan_id: String, user_id: String },
    /// A staff role was granted.
    RoleAssigned {
        clan_id: String,
        user_id: String,
        role: String,
    },
    /// A staff role was revoked.
    RoleUnassigned { clan_id: String, user_id: String },
    /// A user applied to join a clan.
    JoinApplied { clan_id: String, user_id: String },
    /// A join request was approved.
    JoinApproved { clan_id: String, user_id: String },
    /// A join request was rejected.
    JoinRejected { clan_id: String, user_id: String },
    /// A blocked applicant was unblocked.
    JoinUnblocked { clan_id: String, user_id: String },
    /// A clan was created.
    ClanCreated { clan_id: String },
    /// Clan ownership moved to a new owner.
    OwnershipTransferred {
        clan_id: String,
        new_owner_id: String,
    },
}

impl AuditEvent {
    /// Stable dotted event kind for downstream consumers.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BanImposed { .. } => "ban.imposed",
            Self::BanLifted { .. } => "ban.lifted",
            Self::AppealSubmitted { .. } => "appeal.submitted",
            Self::AppealReviewed { .. } => "appeal.reviewed",
            Self::MemberSuspended { .. } => "member.suspended",
            Self::MemberUnsuspended { .. } => "member.unsuspended",
            Self::MemberExpelled { .. } => "member.expelled",
            Self::RoleAssigned { .. } => "role.assigned",
            Self::RoleUnassigned { .. } => "role.unassigned",
            Self::JoinApplied { .. } => "join.applied",
            Self::JoinApproved { .. } => "join.approved",
            Self::JoinRejected { .. } => "join.rejected",
            Self::JoinUnblocked { .. } => "join.unblocked",
            Self::ClanCreated { .. } => "clan.created",
            Self::OwnershipTransferred { .. } => "ownership.transferred",
        }
    }
}

/// Trait for publishing audit events.
///
/// Lets the core services publish transitions without depending on the
/// delivery mechanism.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Publish one event.
    async fn publish(&self, event: AuditEvent) -> AppResult<()>;
}

/// Sink that discards all events. Useful for tests and tooling.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpAuditSink;

#[async_trait]
impl AuditSink for NoOpAuditSink {
    async fn publish(&self, _event: AuditEvent) -> AppResult<()> {
        Ok(())
    }
}

/// Publish an event, logging and swallowing sink failures.
pub(crate) async fn emit(sink: &dyn AuditSink, event: AuditEvent) {
    let kind = event.kind();
    if let Err(e) = sink.publish(event).await {
        tracing::warn!(event = kind, error = %e, "audit sink publish failed");
    }
}
