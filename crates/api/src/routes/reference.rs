//! Route definitions for the `/reference` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reference;
use crate::state::AppState;

/// Routes mounted at `/reference`.
///
/// ```text
/// GET  /{category}           -> list_reference
/// POST /{category}/snapshot  -> snapshot_reference
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{category}", get(reference::list_reference))
        .route("/{category}/snapshot", post(reference::snapshot_reference))
}
