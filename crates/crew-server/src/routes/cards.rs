use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use crew_core::card::{avatar_client, load_avatars, render_cards};
use std::time::Duration;

use super::{blocking, load_agents};
use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /api/cards.png: render the sheet from cached personas
// ---------------------------------------------------------------------------

/// Renders what is already cached; agents without a persona get placeholder
/// cards. Enrichment is a separate, explicit request.
pub async fn get_cards(State(app): State<AppState>) -> Result<Response, AppError> {
    let (config, agents) = load_agents(&app).await?;

    let client = avatar_client(Duration::from_secs(config.avatar.fetch_timeout_secs));
    let avatars = load_avatars(&agents, &client).await;

    let png = blocking(move || Ok(render_cards(&agents, &avatars)?)).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}
