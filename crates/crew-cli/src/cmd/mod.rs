pub mod cache;
pub mod config;
pub mod generate;
pub mod list;
pub mod new;
pub mod serve;
pub mod skills;

use anyhow::Context;
use crew_core::config::Config;
use crew_core::scan::Repository;
use std::path::{Path, PathBuf};

/// Discovery locations for `root`, honouring `--agents-dir` and `--no-plugins`.
pub(crate) fn repository(
    root: &Path,
    config: &Config,
    agents_dir: Option<PathBuf>,
    no_plugins: bool,
) -> Repository {
    let mut repo = Repository::for_root(root, config);
    if let Some(dir) = agents_dir {
        repo = repo.with_agents_dir(dir);
    }
    if no_plugins {
        repo = repo.with_plugins(false);
    }
    repo
}

pub(crate) fn load_config(root: &Path) -> anyhow::Result<Config> {
    Config::load(root).context("failed to load .claude/crew.yaml")
}

pub(crate) fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("failed to start async runtime")
}
