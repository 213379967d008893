use crate::types::DbId;
use crate::validation::FieldErrors;

/// Which identity field collided with an existing user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    Email,
    Phone,
}

impl IdentityField {
    pub fn as_str(self) -> &'static str {
        match self {
            IdentityField::Email => "email",
            IdentityField::Phone => "phone",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed: {0}")]
    InvalidFields(FieldErrors),

    #[error("Edit conflict on {entity} {id}: the record was modified by another request")]
    EditConflict { entity: &'static str, id: DbId },

    #[error("Entitlement denied ({field}): {message}")]
    EntitlementDenied {
        field: &'static str,
        message: String,
    },

    #[error("A user with this {} already exists", .0.as_str())]
    DuplicateIdentity(IdentityField),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid authentication credentials")]
    InvalidCredentials,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The seller already owns as many listings as their plan allows.
    pub fn listing_limit_reached() -> Self {
        CoreError::EntitlementDenied {
            field: "limit",
            message: "You have reached your Listing Limit".to_string(),
        }
    }

    /// The seller already has as many featured listings as their plan allows.
    pub fn featured_limit_reached() -> Self {
        CoreError::EntitlementDenied {
            field: "featured",
            message: "You have reached your Featured Listing Limit".to_string(),
        }
    }
}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        CoreError::InvalidFields(errors)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn duplicate_identity_names_the_field() {
        let err = CoreError::DuplicateIdentity(IdentityField::Phone);
        assert_eq!(err.to_string(), "A user with this phone already exists");
    }

    #[test]
    fn listing_limit_is_reported_on_the_limit_field() {
        assert_matches!(
            CoreError::listing_limit_reached(),
            CoreError::EntitlementDenied { field: "limit", .. }
        );
        assert_matches!(
            CoreError::featured_limit_reached(),
            CoreError::EntitlementDenied { field: "featured", .. }
        );
    }
}
