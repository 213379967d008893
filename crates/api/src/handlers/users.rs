//! Handlers for the `/users` resource: registration and the caller's profile.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use autobazaar_core::error::CoreError;
use autobazaar_core::identity::Entitlements;
use autobazaar_core::reference::sentinel;
use autobazaar_core::types::RefId;
use autobazaar_core::validation::{
    validate_email, validate_name, validate_password_plaintext, validate_phone, FieldErrors,
};
use autobazaar_db::models::user::{
    CreateDealer, CreateUser, Dealer, UpdateDealer, UpdateUser, UserResponse,
};
use autobazaar_db::repositories::{DealerRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::hash_password_blocking;
use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /users/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, with = "sentinel")]
    pub city: Option<RefId>,
    #[serde(default)]
    pub is_dealer: bool,
    #[serde(default)]
    #[validate(length(max = 500, message = "must not be more than 500 characters long"))]
    pub address: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "must not be more than 100 characters long"))]
    pub timings: String,
}

/// Request body for `PUT /users/me`.
///
/// `version` and `dealer_version` are the values the client last read; when
/// omitted the current stored versions are used.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "sentinel")]
    pub city: Option<RefId>,
    #[serde(default)]
    #[validate(length(max = 500, message = "must not be more than 500 characters long"))]
    pub address: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "must not be more than 100 characters long"))]
    pub timings: String,
    pub version: Option<i32>,
    pub dealer_version: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub dealer: Option<Dealer>,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub dealer: Option<Dealer>,
    pub entitlements: Entitlements,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_dealer_fields(errors: &mut FieldErrors, city: Option<RefId>, address: &str, timings: &str) {
    errors.check(city.is_some(), "city", "city must be provided");
    errors.check(!address.is_empty(), "address", "address must be provided");
    errors.check(!timings.is_empty(), "timings", "timings must be provided");
}

fn validate_registration(input: &RegisterRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    validate_name(&mut errors, &input.name);
    validate_email(&mut errors, &input.email);
    validate_phone(&mut errors, &input.phone);
    validate_password_plaintext(&mut errors, &input.password);
    if input.is_dealer {
        validate_dealer_fields(&mut errors, input.city, &input.address, &input.timings);
    }
    if let Err(e) = input.validate() {
        errors.merge(e.into());
    }
    errors.into_result()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users/register
///
/// Create an individual account, or a dealer account when `is_dealer` is set.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProfileResponse>>)> {
    validate_registration(&input).map_err(CoreError::from)?;

    let password_hash = hash_password_blocking(input.password.clone())
        .await
        .map_err(AppError::InternalError)?;

    let new_user = CreateUser {
        name: input.name,
        email: input.email,
        phone: input.phone,
        password_hash,
        city: input.city,
    };

    let (user, dealer) = if input.is_dealer {
        let dealer = CreateDealer {
            address: input.address,
            timings: input.timings,
        };
        let (user, dealer) = UserRepo::create_with_dealer(&state.pool, &new_user, &dealer).await?;
        (user, Some(dealer))
    } else {
        (UserRepo::create(&state.pool, &new_user).await?, None)
    };

    tracing::info!(user_id = user.id, is_dealer = dealer.is_some(), "User registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ProfileResponse {
                user: user.to_response(dealer.is_some()),
                dealer,
            },
        }),
    ))
}

/// GET /api/v1/users/me
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let user = auth.user;
    let dealer = DealerRepo::find_by_user(&state.pool, user.id).await?;
    let entitlements = UserRepo::entitlements(&state.pool, user.id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: user.id,
        })?;

    Ok(Json(DataResponse {
        data: MeResponse {
            user: user.to_response(dealer.is_some()),
            dealer,
            entitlements,
        },
    }))
}

/// PUT /api/v1/users/me
///
/// Update name and city; dealers also update address and timings, in the
/// same transaction. Both rows are version-guarded.
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(input): ApiJson<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    let current = auth.user;
    let dealer = DealerRepo::find_by_user(&state.pool, current.id).await?;

    let mut errors = FieldErrors::new();
    validate_name(&mut errors, &input.name);
    if dealer.is_some() {
        validate_dealer_fields(&mut errors, input.city, &input.address, &input.timings);
    }
    if let Err(e) = input.validate() {
        errors.merge(e.into());
    }
    errors.into_result().map_err(CoreError::from)?;

    let conflict = || {
        AppError::Core(CoreError::EditConflict {
            entity: "user",
            id: current.id,
        })
    };

    let version = input.version.unwrap_or(current.version);
    let changes = UpdateUser {
        name: input.name,
        city: input.city,
    };

    let (user, dealer) = match dealer {
        Some(existing) => {
            let dealer_changes = UpdateDealer {
                address: input.address,
                timings: input.timings,
            };
            let dealer_version = input.dealer_version.unwrap_or(existing.version);
            let (user, dealer) = UserRepo::update_with_dealer(
                &state.pool,
                current.id,
                version,
                &changes,
                dealer_version,
                &dealer_changes,
            )
            .await?
            .ok_or_else(conflict)?;
            (user, Some(dealer))
        }
        None => {
            let user = UserRepo::update(&state.pool, current.id, version, &changes)
                .await?
                .ok_or_else(conflict)?;
            (user, None)
        }
    };

    Ok(Json(DataResponse {
        data: ProfileResponse {
            user: user.to_response(dealer.is_some()),
            dealer,
        },
    }))
}
