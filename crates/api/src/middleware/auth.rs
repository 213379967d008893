//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use autobazaar_core::error::CoreError;
use autobazaar_core::tokens::{hash_token, SCOPE_AUTHENTICATION};
use autobazaar_db::models::user::User;
use autobazaar_db::repositories::UserRepo;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller, resolved from the `Authorization: Bearer <token>`
/// header.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let user = UserRepo::find_for_token(&state.pool, &hash_token(token.trim()), SCOPE_AUTHENTICATION)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid or expired authentication token".into(),
                ))
            })?;

        Ok(AuthUser { user })
    }
}
