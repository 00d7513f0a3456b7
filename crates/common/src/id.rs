//! ID generation and validation utilities.

use crate::error::{AppError, AppResult};
use ulid::Ulid;
use uuid::Uuid;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a cryptographically secure random token.
    ///
    /// Used for stable external keys that must survive account deletion;
    /// tokens carry no time component.
    #[must_use]
    pub fn generate_token(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Validate an entity identifier before it reaches the storage layer.
///
/// Malformed identifiers are input errors: they are rejected here, before
/// any transaction opens, and are never retried.
pub fn validate_id(id: &str) -> AppResult<()> {
    if id.len() == 26 && Ulid::from_string(&id.to_uppercase()).is_ok() {
        Ok(())
    } else {
        Err(AppError::MalformedId(id.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generated_ids_validate() {
        let id_gen = IdGenerator::new();
        validate_id(&id_gen.generate()).unwrap();
    }

    #[test]
    fn test_malformed_ids_rejected() {
        for bad in ["", "abc", "not-a-valid-identifier-----", "'; DROP TABLE clan; --"] {
            let err = validate_id(bad).unwrap_err();
            assert_eq!(err.error_code(), "MALFORMED_ID");
        }
    }

    #[test]
    fn test_generate_token() {
        let id_gen = IdGenerator::new();
        let token = id_gen.generate_token();

        assert_eq!(token.len(), 32); // Simple UUID without hyphens
    }
}
