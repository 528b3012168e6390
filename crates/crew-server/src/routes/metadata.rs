use axum::extract::{Path, State};
use axum::Json;
use crew_core::cache::MetadataCache;

use super::blocking;
use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /api/metadata: the whole persona cache
// ---------------------------------------------------------------------------

pub async fn list_metadata(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let entries = blocking(move || {
        let config = app.config()?;
        Ok(MetadataCache::open(&app.root, &config).entries().clone())
    })
    .await?;
    Ok(Json(serde_json::to_value(entries)?))
}

// ---------------------------------------------------------------------------
// DELETE /api/metadata/{name}: force regeneration on the next enrich
// ---------------------------------------------------------------------------

pub async fn delete_metadata(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let _running = app.enrich_lock.lock().await;
    let target = name.clone();
    let state = app.clone();
    let removed = blocking(move || {
        let config = state.config()?;
        Ok(MetadataCache::open(&state.root, &config).delete(&target)?)
    })
    .await?;

    if !removed {
        return Err(AppError::not_found(format!("no metadata for '{name}'")));
    }
    tracing::info!(agent = %name, "metadata deleted");
    Ok(Json(serde_json::json!({ "deleted": name })))
}
