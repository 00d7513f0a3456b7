//! Role hierarchy and the staff action authorizer.
//!
//! Every mutating clan-staff operation (suspend, expel, role assignment)
//! asks this module "may actor A do X to target T?" before touching any
//! state. The decision is a pure function of its inputs: the same
//! if/else ladder is not repeated per handler, and the rank matrix is
//! plain data that can be tested against the full actor×target×action
//! cross-product.

use clanhub_common::{AppError, AppResult};
use clanhub_db::entities::staff_assignment::StaffRole;
use serde::{Deserialize, Serialize};

/// Effective role of a user within one clan.
///
/// The absence of a staff assignment is an explicit variant rather than a
/// nullable checked ad hoc at call sites, so the permission matrix is a
/// total function over roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClanRole {
    /// Full control; exactly one per clan.
    Creator,
    /// May act on moderators and roleless members.
    Administrator,
    /// Non-destructive oversight only.
    Moderator,
    /// Plain member or non-member; no staff authority.
    NoRole,
}

impl ClanRole {
    /// Position in the total order `Creator > Administrator > Moderator > NoRole`.
    ///
    /// Used only for comparisons, never serialized.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Creator => 3,
            Self::Administrator => 2,
            Self::Moderator => 1,
            Self::NoRole => 0,
        }
    }

    /// Whether this role may review clan join applications.
    #[must_use]
    pub const fn can_review_applications(self) -> bool {
        self.rank() >= 1
    }

    /// Whether this role may change clan settings.
    #[must_use]
    pub const fn can_manage_settings(self) -> bool {
        self.rank() >= 2
    }
}

impl From<Option<StaffRole>> for ClanRole {
    fn from(role: Option<StaffRole>) -> Self {
        match role {
            Some(StaffRole::Creator) => Self::Creator,
            Some(StaffRole::Administrator) => Self::Administrator,
            Some(StaffRole::Moderator) => Self::Moderator,
            None => Self::NoRole,
        }
    }
}

/// A staff action one member performs on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffAction {
    /// Suspend or unsuspend a member within the clan.
    Suspend,
    /// Expel (hard delete) a member from the clan.
    Expel,
    /// Grant a staff role.
    AssignRole,
    /// Revoke a staff role.
    UnassignRole,
}

/// One authorization question: may `actor` do `action` to `target`?
#[derive(Debug, Clone, Copy)]
pub struct StaffActionRequest<'a> {
    /// Acting user.
    pub actor_id: &'a str,
    /// Acting user's effective clan role.
    pub actor_role: ClanRole,
    /// Targeted user.
    pub target_id: &'a str,
    /// Targeted user's effective clan role.
    pub target_role: ClanRole,
    /// Whether the target member is currently suspended in the clan.
    pub target_suspended: bool,
    /// The action being attempted.
    pub action: StaffAction,
}

/// The rank matrix, indexed `[actor.rank()][target.rank()]`.
///
/// Row order: NoRole, Moderator, Administrator, Creator. Moderators are
/// denied every destructive action regardless of target; Administrators
/// may act downward only; the Creator may act on anyone.
const ALLOW: [[bool; 4]; 4] = [
    // target:  NoRole Moderator Administrator Creator
    /* NoRole        */ [false, false, false, false],
    /* Moderator     */ [false, false, false, false],
    /* Administrator */ [true, true, false, false],
    /* Creator       */ [true, true, true, true],
];

/// Decide whether the requested staff action is permitted.
///
/// Pure and side-effect free; callers resolve roles first and may
/// evaluate this outside any transaction. Checks, in order: self-target,
/// creator-target, the rank matrix, and the expel-vs-suspended
/// constraint.
pub fn authorize(req: &StaffActionRequest<'_>) -> AppResult<()> {
    if req.actor_id == req.target_id {
        return Err(AppError::SelfActionAttempt);
    }

    // A Creator can never be the target; ownership must move first.
    if req.target_role == ClanRole::Creator {
        return Err(AppError::TransferOwnershipRequired);
    }

    if !ALLOW[req.actor_role.rank() as usize][req.target_role.rank() as usize] {
        return Err(AppError::InvalidPermissions(format!(
            "{:?} may not perform staff actions on {:?}",
            req.actor_role, req.target_role
        )));
    }

    // Suspension and expulsion are mutually exclusive pending states.
    if req.action == StaffAction::Expel && req.target_suspended {
        return Err(AppError::UserSuspended);
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ROLES: [ClanRole; 4] = [
        ClanRole::Creator,
        ClanRole::Administrator,
        ClanRole::Moderator,
        ClanRole::NoRole,
    ];

    const ACTIONS: [StaffAction; 4] = [
        StaffAction::Suspend,
        StaffAction::Expel,
        StaffAction::AssignRole,
        StaffAction::UnassignRole,
    ];

    fn request<'a>(
        actor_role: ClanRole,
        target_role: ClanRole,
        action: StaffAction,
    ) -> StaffActionRequest<'a> {
        StaffActionRequest {
            actor_id: "actor",
            actor_role,
            target_id: "target",
            target_role,
            target_suspended: false,
            action,
        }
    }

    #[test]
    fn test_rank_total_order() {
        assert!(ClanRole::Creator.rank() > ClanRole::Administrator.rank());
        assert!(ClanRole::Administrator.rank() > ClanRole::Moderator.rank());
        assert!(ClanRole::Moderator.rank() > ClanRole::NoRole.rank());
    }

    #[test]
    fn test_role_from_assignment() {
        use clanhub_db::entities::staff_assignment::StaffRole;

        assert_eq!(ClanRole::from(Some(StaffRole::Creator)), ClanRole::Creator);
        assert_eq!(
            ClanRole::from(Some(StaffRole::Administrator)),
            ClanRole::Administrator
        );
        assert_eq!(ClanRole::from(Some(StaffRole::Moderator)), ClanRole::Moderator);
        assert_eq!(ClanRole::from(None), ClanRole::NoRole);
    }

    #[test]
    fn test_full_cross_product() {
        for actor in ROLES {
            for target in ROLES {
                for action in ACTIONS {
                    let result = authorize(&request(actor, target, action));

                    if target == ClanRole::Creator {
                        assert_eq!(
                            result.unwrap_err().error_code(),
                            "TRANSFER_OWNERSHIP_ACTION_REQUIRED",
                            "{actor:?} on Creator must require ownership transfer"
                        );
                    } else if actor == ClanRole::Creator
                        || (actor == ClanRole::Administrator
                            && matches!(target, ClanRole::Moderator | ClanRole::NoRole))
                    {
                        assert!(result.is_ok(), "{actor:?} on {target:?} ({action:?}) must allow");
                    } else {
                        assert_eq!(
                            result.unwrap_err().error_code(),
                            "INVALID_PERMISSIONS",
                            "{actor:?} on {target:?} ({action:?}) must deny"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_self_action_denied_for_every_role() {
        for role in ROLES {
            for action in ACTIONS {
                let req = StaffActionRequest {
                    actor_id: "same",
                    actor_role: role,
                    target_id: "same",
                    target_role: role,
                    target_suspended: false,
                    action,
                };
                assert_eq!(
                    authorize(&req).unwrap_err().error_code(),
                    "SELF_ACTION_ATTEMPT"
                );
            }
        }
    }

    #[test]
    fn test_suspended_target_cannot_be_expelled() {
        let mut req = request(ClanRole::Creator, ClanRole::NoRole, StaffAction::Expel);
        req.target_suspended = true;

        assert_eq!(authorize(&req).unwrap_err().error_code(), "USER_SUSPENDED");

        // Suspension only blocks expulsion, not role changes.
        let mut req = request(ClanRole::Creator, ClanRole::NoRole, StaffAction::AssignRole);
        req.target_suspended = true;
        assert!(authorize(&req).is_ok());
    }

    #[test]
    fn test_authorize_is_deterministic() {
        let req = request(ClanRole::Administrator, ClanRole::Moderator, StaffAction::Suspend);
        assert!(authorize(&req).is_ok());
        assert!(authorize(&req).is_ok());
    }

    #[test]
    fn test_review_and_settings_capabilities() {
        assert!(ClanRole::Creator.can_review_applications());
        assert!(ClanRole::Administrator.can_review_applications());
        assert!(ClanRole::Moderator.can_review_applications());
        assert!(!ClanRole::NoRole.can_review_applications());

        assert!(ClanRole::Creator.can_manage_settings());
        assert!(ClanRole::Administrator.can_manage_settings());
        assert!(!ClanRole::Moderator.can_manage_settings());
        assert!(!ClanRole::NoRole.can_manage_settings());
    }
}
