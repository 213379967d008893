//! Route definitions for the `/listings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::listings;
use crate::state::AppState;

/// Routes mounted at `/listings`.
///
/// ```text
/// GET  /            -> list_listings
/// POST /            -> create_listing (requires auth)
/// GET  /home        -> home_feed
/// GET  /{id}        -> get_listing
/// PUT  /{id}        -> update_listing (owner)
/// GET  /{id}/edit   -> edit_listing (owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(listings::list_listings).post(listings::create_listing),
        )
        .route("/home", get(listings::home_feed))
        .route(
            "/{id}",
            get(listings::get_listing).put(listings::update_listing),
        )
        .route("/{id}/edit", get(listings::edit_listing))
}
