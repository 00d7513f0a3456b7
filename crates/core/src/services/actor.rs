//! The authenticated caller.

use clanhub_db::entities::user::PlatformRole;

/// The authenticated actor behind a request.
///
/// Supplied by the identity/session provider for every call; the engine
/// never resolves sessions itself.
#[derive(Debug, Clone)]
pub struct Actor {
    /// The acting user's ID.
    pub user_id: String,
    /// Platform-wide role, independent of any clan.
    pub platform_role: PlatformRole,
}

impl Actor {
    /// Create an actor with no platform authority.
    #[must_use]
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            platform_role: PlatformRole::None,
        }
    }

    /// Create an actor with the given platform role.
    #[must_use]
    pub fn with_role(user_id: impl Into<String>, platform_role: PlatformRole) -> Self {
        Self {
            user_id: user_id.into(),
            platform_role,
        }
    }
}
