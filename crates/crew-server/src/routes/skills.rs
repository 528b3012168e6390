use axum::extract::{Path, State};
use axum::Json;

use super::blocking;
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_skills(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let skills = blocking(move || {
        let config = app.config()?;
        Ok(app.repository(&config).skills()?)
    })
    .await?;
    Ok(Json(serde_json::to_value(skills)?))
}

pub async fn get_skill(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let skill = blocking(move || {
        let config = app.config()?;
        Ok(app.repository(&config).find_skill(&name)?)
    })
    .await?;
    Ok(Json(serde_json::to_value(skill)?))
}
