use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use autobazaar_core::error::{CoreError, IdentityField};
use autobazaar_db::error::violated_reference;
use autobazaar_db::StoreErrorKind;
use serde_json::{json, Map, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `autobazaar_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed request body, path or query string.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Status, machine code, message and optional per-field detail of an error.
struct ErrorParts {
    status: StatusCode,
    code: &'static str,
    message: String,
    fields: Option<Value>,
}

impl ErrorParts {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            fields: None,
        }
    }

    fn with_field(mut self, field: &str, message: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(field.to_string(), Value::String(message.into()));
        self.fields = Some(Value::Object(map));
        self
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let parts = match &self {
            AppError::Core(core) => core_error_parts(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => {
                ErrorParts::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ErrorParts::internal()
            }
        };

        let mut body = json!({
            "error": parts.message,
            "code": parts.code,
        });
        if let (Some(fields), Value::Object(obj)) = (parts.fields, &mut body) {
            obj.insert("fields".into(), fields);
        }

        (parts.status, axum::Json(body)).into_response()
    }
}

fn core_error_parts(core: &CoreError) -> ErrorParts {
    match core {
        CoreError::NotFound { entity, id } => ErrorParts::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => {
            ErrorParts::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", msg.clone())
        }
        CoreError::InvalidFields(errors) => {
            let mut parts = ErrorParts::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                "One or more fields are invalid",
            );
            parts.fields = serde_json::to_value(errors).ok();
            parts
        }
        CoreError::EditConflict { .. } => ErrorParts::new(
            StatusCode::CONFLICT,
            "EDIT_CONFLICT",
            "Unable to update the record due to an edit conflict, please try again",
        ),
        CoreError::EntitlementDenied { field, message } => ErrorParts::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "ENTITLEMENT_DENIED",
            message.clone(),
        )
        .with_field(field, message.clone()),
        CoreError::DuplicateIdentity(field) => {
            let message = match field {
                IdentityField::Email => "a user with this email address already exists",
                IdentityField::Phone => "a user with this phone already exists",
            };
            ErrorParts::new(StatusCode::UNPROCESSABLE_ENTITY, "DUPLICATE_IDENTITY", message)
                .with_field(field.as_str(), message)
        }
        CoreError::Unauthorized(msg) => {
            ErrorParts::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
        }
        CoreError::InvalidCredentials => ErrorParts::new(
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            "Invalid authentication credentials",
        ),
        CoreError::Forbidden(msg) => {
            ErrorParts::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            ErrorParts::internal()
        }
    }
}

/// Classify a sqlx error into an HTTP response.
///
/// Store-level outcomes with a domain meaning (quota triggers, unique
/// identity constraints, unknown references) are reported like the matching
/// domain error; infrastructure failures are logged and sanitized.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match StoreErrorKind::classify(err) {
        StoreErrorKind::NotFound => {
            ErrorParts::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        StoreErrorKind::ListingLimitReached => {
            core_error_parts(&CoreError::listing_limit_reached())
        }
        StoreErrorKind::FeaturedLimitReached => {
            core_error_parts(&CoreError::featured_limit_reached())
        }
        StoreErrorKind::DuplicateEmail => {
            core_error_parts(&CoreError::DuplicateIdentity(IdentityField::Email))
        }
        StoreErrorKind::DuplicatePhone => {
            core_error_parts(&CoreError::DuplicateIdentity(IdentityField::Phone))
        }
        StoreErrorKind::InvalidReference => {
            let field = violated_reference(err).unwrap_or_else(|| "reference".to_string());
            ErrorParts::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                "One or more fields are invalid",
            )
            .with_field(&field, "must reference an existing record")
        }
        StoreErrorKind::Timeout => {
            tracing::error!(error = %err, "Store call timed out");
            ErrorParts::new(
                StatusCode::GATEWAY_TIMEOUT,
                "STORE_TIMEOUT",
                "The data store did not respond in time",
            )
        }
        StoreErrorKind::Unavailable => {
            tracing::error!(error = %err, "Store unavailable");
            ErrorParts::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "The data store is unavailable",
            )
        }
        StoreErrorKind::Other => {
            tracing::error!(error = %err, "Database error");
            ErrorParts::internal()
        }
    }
}
