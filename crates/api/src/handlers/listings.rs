//! Handlers for the `/listings` resource: catalog, home feed, detail and the
//! owner's create/edit/update flow.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use autobazaar_core::catalog::{HomeFeedSection, ListingQueryParams};
use autobazaar_core::error::CoreError;
use autobazaar_core::listing::ListingAttributes;
use autobazaar_core::types::DbId;
use autobazaar_db::models::listing::{
    CreatedListing, ListingDetail, ListingForUpdate, ListingPage, ListingSummary, UpdateListing,
    UpdateOutcome,
};
use autobazaar_db::repositories::ListingRepo;
use autobazaar_db::DbPool;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Key of the single home-feed entry in [`AppState::home_feed`].
const HOME_FEED_KEY: &str = "feed";

/// The three fixed sections of the landing page.
#[derive(Debug, Clone, Serialize)]
pub struct HomeFeed {
    pub featured_listings: Vec<ListingSummary>,
    pub gp_managed_listings: Vec<ListingSummary>,
    pub recent_listings: Vec<ListingSummary>,
}

#[derive(Debug, Serialize)]
pub struct ListingEnvelope<T: Serialize> {
    pub listing: T,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "listing",
        id,
    })
}

/// Non-positive ids can never match a row.
fn checked_id(id: DbId) -> AppResult<DbId> {
    if id < 1 {
        return Err(not_found(id));
    }
    Ok(id)
}

/// Load the raw row and confirm the caller owns it.
async fn owned_listing(pool: &DbPool, id: DbId, auth: &AuthUser) -> AppResult<ListingForUpdate> {
    let listing = ListingRepo::find_for_update(pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if listing.seller != auth.user.id {
        return Err(CoreError::Forbidden("You do not own this listing".into()).into());
    }
    Ok(listing)
}

async fn load_home_feed(pool: &DbPool) -> Result<HomeFeed, sqlx::Error> {
    let [featured, managed, recent] = HomeFeedSection::ALL.map(|section| section.query());
    let featured = ListingRepo::list(pool, &featured).await?;
    let managed = ListingRepo::list(pool, &managed).await?;
    let recent = ListingRepo::list(pool, &recent).await?;
    Ok(HomeFeed {
        featured_listings: featured.listings,
        gp_managed_listings: managed.listings,
        recent_listings: recent.listings,
    })
}

// ---------------------------------------------------------------------------
// Public reads
// ---------------------------------------------------------------------------

/// GET /api/v1/listings
///
/// Filtered, sorted and paginated catalog. Every malformed parameter is
/// reported by name before any query runs.
pub async fn list_listings(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListingQueryParams>,
) -> AppResult<Json<DataResponse<ListingPage>>> {
    let query = params.parse().map_err(CoreError::from)?;
    let page = ListingRepo::list(&state.pool, &query).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/listings/home
pub async fn home_feed(State(state): State<AppState>) -> AppResult<Json<DataResponse<HomeFeed>>> {
    let pool = state.pool.clone();
    let feed = state
        .home_feed
        .get_or_try_insert(HOME_FEED_KEY, || async move { load_home_feed(&pool).await })
        .await?;
    Ok(Json(DataResponse { data: feed }))
}

/// GET /api/v1/listings/{id}
pub async fn get_listing(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<ListingEnvelope<ListingDetail>>>> {
    let id = checked_id(id)?;
    let listing = ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse {
        data: ListingEnvelope { listing },
    }))
}

// ---------------------------------------------------------------------------
// Owner writes
// ---------------------------------------------------------------------------

/// POST /api/v1/listings
///
/// The seller is always the caller. The store refuses the insert once the
/// caller is at their listing limit.
pub async fn create_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(input): ApiJson<ListingAttributes>,
) -> AppResult<(StatusCode, Json<DataResponse<ListingEnvelope<CreatedListing>>>)> {
    input.check().map_err(CoreError::from)?;

    let listing = ListingRepo::create(&state.pool, auth.user.id, &input).await?;
    tracing::info!(listing_id = listing.id, seller = auth.user.id, "Listing created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ListingEnvelope { listing },
        }),
    ))
}

/// GET /api/v1/listings/{id}/edit
///
/// Raw reference ids and the current `upversion`, for the owner's edit form.
pub async fn edit_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<ListingEnvelope<ListingForUpdate>>>> {
    let id = checked_id(id)?;
    let listing = owned_listing(&state.pool, id, &auth).await?;
    Ok(Json(DataResponse {
        data: ListingEnvelope { listing },
    }))
}

/// PUT /api/v1/listings/{id}
///
/// Applies only if `upversion` still matches the stored row; otherwise the
/// caller gets 409 and must re-read.
pub async fn update_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<UpdateListing>,
) -> AppResult<Json<DataResponse<ListingEnvelope<ListingForUpdate>>>> {
    let id = checked_id(id)?;
    input.attributes.check().map_err(CoreError::from)?;
    owned_listing(&state.pool, id, &auth).await?;

    match ListingRepo::update(&state.pool, id, &input).await? {
        UpdateOutcome::Updated(upversion) => {
            tracing::info!(listing_id = id, upversion, "Listing updated");
        }
        UpdateOutcome::Conflict => {
            tracing::debug!(listing_id = id, expected = input.upversion, "Listing edit conflict");
            return Err(CoreError::EditConflict {
                entity: "listing",
                id,
            }
            .into());
        }
        UpdateOutcome::NotFound => return Err(not_found(id)),
    }

    let listing = ListingRepo::find_for_update(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse {
        data: ListingEnvelope { listing },
    }))
}
