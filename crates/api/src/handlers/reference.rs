//! Handlers for the read-only reference data.

use std::path::PathBuf;

use axum::extract::State;
use axum::Json;
use autobazaar_core::reference::ReferenceCategory;
use autobazaar_db::models::reference::ReferenceRows;
use autobazaar_db::repositories::ReferenceRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::ApiPath;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub category: &'static str,
    pub path: PathBuf,
    pub records: usize,
}

fn parse_category(slug: &str) -> AppResult<ReferenceCategory> {
    ReferenceCategory::from_slug(slug)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown reference category '{slug}'")))
}

/// GET /api/v1/reference/{category}
pub async fn list_reference(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> AppResult<Json<DataResponse<ReferenceRows>>> {
    let category = parse_category(&slug)?;
    let rows = ReferenceRepo::list(&state.pool, category).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// POST /api/v1/reference/{category}/snapshot
///
/// Write the category as pretty-printed JSON to
/// `<snapshot_dir>/<category>.json`, replacing any previous snapshot.
pub async fn snapshot_reference(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> AppResult<Json<DataResponse<SnapshotResponse>>> {
    let category = parse_category(&slug)?;
    let rows = ReferenceRepo::list(&state.pool, category).await?;

    let bytes = serde_json::to_vec_pretty(&rows)
        .map_err(|e| AppError::InternalError(format!("Snapshot serialization failed: {e}")))?;

    let dir = &state.config.snapshot_dir;
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        AppError::InternalError(format!("Cannot create {}: {e}", dir.display()))
    })?;
    let path = dir.join(category.snapshot_file_name());
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Cannot write {}: {e}", path.display())))?;

    tracing::info!(%category, path = %path.display(), records = rows.len(), "Reference snapshot written");

    Ok(Json(DataResponse {
        data: SnapshotResponse {
            category: category.slug(),
            path,
            records: rows.len(),
        },
    }))
}
