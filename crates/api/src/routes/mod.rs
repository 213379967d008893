pub mod health;
pub mod listings;
pub mod reference;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users/register                       register (public)
/// /users/authentication                 issue token (POST), revoke all (DELETE)
/// /users/me                             get, update (auth required)
///
/// /listings                             catalog (GET), create (POST, auth)
/// /listings/home                        cached home feed
/// /listings/{id}                        detail (GET), update (PUT, owner)
/// /listings/{id}/edit                   raw row for editing (owner)
///
/// /reference/{category}                 list a reference category
/// /reference/{category}/snapshot        write JSON snapshot (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/listings", listings::router())
        .nest("/reference", reference::router())
}
