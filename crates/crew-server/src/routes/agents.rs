use axum::extract::{Path, State};
use axum::Json;
use crew_core::cache::MetadataCache;
use crew_core::persona::{ClaudeGenerator, EnrichOptions, Enricher};
use tokio::runtime::Handle;

use super::{blocking, load_agents};
use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /api/agents
// ---------------------------------------------------------------------------

pub async fn list_agents(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let (_, agents) = load_agents(&app).await?;
    Ok(Json(serde_json::to_value(agents)?))
}

// ---------------------------------------------------------------------------
// GET /api/agents/{name}
// ---------------------------------------------------------------------------

pub async fn get_agent(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let agent = blocking(move || {
        let config = app.config()?;
        let mut agent = app.repository(&config).find_agent(&name)?;
        MetadataCache::open(&app.root, &config).attach(std::slice::from_mut(&mut agent));
        Ok(agent)
    })
    .await?;
    Ok(Json(serde_json::to_value(agent)?))
}

// ---------------------------------------------------------------------------
// POST /api/agents/enrich
// ---------------------------------------------------------------------------

/// Mint personas for every agent missing one. Claude must be installed, and
/// the first failed generation fails the whole request.
pub async fn enrich_agents(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let _running = app.enrich_lock.lock().await;

    // Cache file I/O happens after every persona; run on the blocking pool.
    let state = app.clone();
    let (report, agents) = blocking(move || {
        let config = state.config()?;
        let mut agents = state.repository(&config).agents()?;
        let generator = ClaudeGenerator::new(config.claude.print_options());
        let mut cache = MetadataCache::open(&state.root, &config);
        let enricher = Enricher::new(&generator, EnrichOptions::strict(config.avatar.base_url.clone()));
        let report = Handle::current().block_on(enricher.enrich_all(&mut agents, &mut cache))?;
        Ok((report, agents))
    })
    .await?;

    tracing::info!(
        generated = report.generated,
        cached = report.cached,
        "enrichment finished"
    );
    Ok(Json(serde_json::json!({
        "report": report,
        "agents": agents,
    })))
}
