pub mod agents;
pub mod cards;
pub mod metadata;
pub mod skills;

use crate::error::AppError;
use crate::state::AppState;
use crew_core::agent::Agent;
use crew_core::cache::MetadataCache;
use crew_core::config::Config;

/// Run filesystem work off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?
        .map_err(AppError)
}

/// The current config and every discoverable agent with its cached persona,
/// if any.
pub(crate) async fn load_agents(app: &AppState) -> Result<(Config, Vec<Agent>), AppError> {
    let app = app.clone();
    blocking(move || {
        let config = app.config()?;
        let mut agents = app.repository(&config).agents()?;
        MetadataCache::open(&app.root, &config).attach(&mut agents);
        Ok((config, agents))
    })
    .await
}
