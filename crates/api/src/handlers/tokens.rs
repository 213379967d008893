//! Handlers for authentication tokens (issue and revoke).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use autobazaar_core::error::CoreError;
use autobazaar_core::identity::Identifier;
use autobazaar_core::tokens::{generate_token, SCOPE_AUTHENTICATION};
use autobazaar_core::types::Timestamp;
use autobazaar_core::validation::{validate_password_plaintext, FieldErrors};
use autobazaar_db::models::token::CreateToken;
use autobazaar_db::repositories::{TokenRepo, UserRepo};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::password::verify_password_blocking;
use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /users/authentication`.
#[derive(Debug, Deserialize)]
pub struct AuthenticationRequest {
    /// Email address or phone number.
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expiry: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct AuthenticationResponse {
    pub authentication_token: IssuedToken,
}

fn classify_identifier(input: &AuthenticationRequest) -> Result<Identifier<'_>, FieldErrors> {
    let mut errors = FieldErrors::new();
    let identifier = if input.identifier.is_empty() {
        errors.add("identifier", "must be provided");
        None
    } else {
        let classified = Identifier::classify(&input.identifier);
        errors.check(
            classified.is_some(),
            "identifier",
            "must be a valid email address or phone number",
        );
        classified
    };
    validate_password_plaintext(&mut errors, &input.password);
    errors.into_result()?;
    identifier.ok_or_else(FieldErrors::new)
}

/// POST /api/v1/users/authentication
///
/// Exchange an email or phone plus password for a bearer token.
pub async fn create_authentication_token(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AuthenticationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthenticationResponse>>)> {
    let identifier = classify_identifier(&input).map_err(CoreError::from)?;

    let user = match identifier {
        Identifier::Email(email) => UserRepo::find_by_email(&state.pool, email).await?,
        Identifier::Phone(phone) => UserRepo::find_by_phone(&state.pool, phone).await?,
    }
    .ok_or(CoreError::InvalidCredentials)?;

    let matches = verify_password_blocking(input.password.clone(), user.password_hash.clone())
        .await
        .map_err(AppError::InternalError)?;
    if !matches {
        tracing::debug!(user_id = user.id, "Password mismatch");
        return Err(CoreError::InvalidCredentials.into());
    }

    let generated = generate_token();
    let expiry = Utc::now() + Duration::hours(state.config.token_ttl_hours);
    let token = TokenRepo::create(
        &state.pool,
        &CreateToken {
            hash: generated.hash,
            user_id: user.id,
            expiry,
            scope: SCOPE_AUTHENTICATION.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Authentication token issued");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AuthenticationResponse {
                authentication_token: IssuedToken {
                    token: generated.plaintext,
                    expiry: token.expiry,
                },
            },
        }),
    ))
}

/// DELETE /api/v1/users/authentication
///
/// Revoke every authentication token the caller holds.
pub async fn delete_authentication_tokens(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<StatusCode> {
    let revoked =
        TokenRepo::delete_all_for_user(&state.pool, auth.user.id, SCOPE_AUTHENTICATION).await?;
    tracing::info!(user_id = auth.user.id, revoked, "Authentication tokens revoked");
    Ok(StatusCode::NO_CONTENT)
}
