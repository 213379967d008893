//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{tokens, users};
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST   /register        -> register
/// POST   /authentication  -> create_authentication_token
/// DELETE /authentication  -> delete_authentication_tokens (requires auth)
/// GET    /me              -> get_me (requires auth)
/// PUT    /me              -> update_me (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route(
            "/authentication",
            post(tokens::create_authentication_token).delete(tokens::delete_authentication_tokens),
        )
        .route("/me", get(users::get_me).put(users::update_me))
}
