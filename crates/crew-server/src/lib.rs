pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router for the project at `root`.
pub fn build_router(root: PathBuf) -> Router {
    router(AppState::new(root))
}

/// Build the axum Router around an existing state. Used by integration tests
/// to point discovery at fixture directories.
pub fn router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Agents
        .route("/api/agents", get(routes::agents::list_agents))
        .route("/api/agents/enrich", post(routes::agents::enrich_agents))
        .route("/api/agents/{name}", get(routes::agents::get_agent))
        // Skills
        .route("/api/skills", get(routes::skills::list_skills))
        .route("/api/skills/{name}", get(routes::skills::get_skill))
        // Metadata cache
        .route("/api/metadata", get(routes::metadata::list_metadata))
        .route("/api/metadata/{name}", delete(routes::metadata::delete_metadata))
        // Card sheet
        .route("/api/cards.png", get(routes::cards::get_cards))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Serve the API on `port`.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    serve_on(root, listener, open_browser).await
}

/// Serve the API on a pre-bound listener, so the caller can read the actual
/// port first when binding to port 0.
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("Crew API listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/cards.png");
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "could not open browser");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
