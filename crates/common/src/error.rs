//! Error types for clanhub.
//!
//! Every rejected precondition maps to a distinct string code so that
//! callers can branch deterministically instead of matching messages.
//! The codes are a public contract shared with other systems.

use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Input errors (rejected before any transaction opens) ===
    #[error("Malformed identifier: {0}")]
    MalformedId(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // === Authentication / authorization ===
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid permissions: {0}")]
    InvalidPermissions(String),

    #[error("Cannot perform this action on yourself")]
    SelfActionAttempt,

    #[error("The clan creator cannot be targeted; transfer ownership first")]
    TransferOwnershipRequired,

    // === State conflicts ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not eligible: {0}")]
    NotEligible(String),

    #[error("Not eligible until the appeal cooldown has elapsed")]
    NotEligibleWaitCooldown,

    #[error("An appeal is already under review for this suspension")]
    InReview,

    #[error("An appeal for this suspension has already been approved")]
    AppealApproved,

    #[error("Appeal has already been finalized")]
    AppealAlreadyFinal,

    #[error("Target member is suspended")]
    UserSuspended,

    // === Server errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedId(_) => "MALFORMED_ID",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::InvalidPermissions(_) => "INVALID_PERMISSIONS",
            Self::SelfActionAttempt => "SELF_ACTION_ATTEMPT",
            Self::TransferOwnershipRequired => "TRANSFER_OWNERSHIP_ACTION_REQUIRED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::NotEligible(_) => "NOT_ELIGIBLE",
            Self::NotEligibleWaitCooldown => "NOT_ELIGIBLE_WAIT_COOLDOWN",
            Self::InReview => "IN_REVIEW",
            Self::AppealApproved => "APPEAL_APPROVED",
            Self::AppealAlreadyFinal => "APPEAL_ALREADY_FINAL",
            Self::UserSuspended => "USER_SUSPENDED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error comes from the storage layer.
    ///
    /// Storage failures are the only class safe to retry: transactions
    /// are all-or-nothing, so a failed attempt leaves no partial state.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Config(_) | Self::Internal(_))
    }

    /// Render the error as the JSON body surfaced to callers.
    #[must_use]
    pub fn to_body(&self) -> serde_json::Value {
        json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        })
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AppError::MalformedId("x".into()).error_code(), "MALFORMED_ID");
        assert_eq!(AppError::SelfActionAttempt.error_code(), "SELF_ACTION_ATTEMPT");
        assert_eq!(
            AppError::TransferOwnershipRequired.error_code(),
            "TRANSFER_OWNERSHIP_ACTION_REQUIRED"
        );
        assert_eq!(
            AppError::NotEligibleWaitCooldown.error_code(),
            "NOT_ELIGIBLE_WAIT_COOLDOWN"
        );
        assert_eq!(AppError::AppealAlreadyFinal.error_code(), "APPEAL_ALREADY_FINAL");
        assert_eq!(AppError::UserSuspended.error_code(), "USER_SUSPENDED");
    }

    #[test]
    fn test_retry_classification() {
        assert!(AppError::Database("connection reset".into()).is_retryable());
        assert!(!AppError::Conflict("already banned".into()).is_retryable());
        assert!(!AppError::InvalidPermissions("denied".into()).is_retryable());
    }

    #[test]
    fn test_body_shape() {
        let body = AppError::InReview.to_body();
        assert_eq!(body["error"]["code"], "IN_REVIEW");
        assert!(body["error"]["message"].is_string());
    }
}
