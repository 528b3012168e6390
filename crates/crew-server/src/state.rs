use crew_core::config::Config;
use crew_core::scan::Repository;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    /// Where definitions are discovered; `None` derives it from the config
    /// on each request.
    pub repository: Option<Repository>,
    /// Held for the whole of an enrichment run so two requests never mint
    /// personas at the same time.
    pub enrich_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            repository: None,
            enrich_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_repository(root: PathBuf, repository: Repository) -> Self {
        Self {
            repository: Some(repository),
            ..Self::new(root)
        }
    }

    pub fn config(&self) -> anyhow::Result<Config> {
        Ok(Config::load(&self.root)?)
    }

    pub fn repository(&self, config: &Config) -> Repository {
        self.repository
            .clone()
            .unwrap_or_else(|| Repository::for_root(&self.root, config))
    }
}
