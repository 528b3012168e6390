use super::{load_config, repository};
use crate::output::{print_json, print_table, truncate};
use anyhow::Context;
use crew_core::agent::{Agent, AgentSource};
use crew_core::cache::MetadataCache;
use std::path::{Path, PathBuf};

fn origin(agent: &Agent) -> String {
    match &agent.source {
        AgentSource::Agent { scope } => scope.to_string(),
        AgentSource::Plugin { plugin } => format!("plugin:{plugin}"),
    }
}

pub fn run(root: &Path, agents_dir: Option<PathBuf>, no_plugins: bool, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let mut agents = repository(root, &config, agents_dir, no_plugins)
        .agents()
        .context("failed to scan agents")?;
    MetadataCache::open(root, &config).attach(&mut agents);

    if json {
        return print_json(&agents);
    }
    if agents.is_empty() {
        println!("No agents found.");
        return Ok(());
    }

    let rows = agents
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                a.persona
                    .as_ref()
                    .map(|p| p.display_name.clone())
                    .unwrap_or_else(|| "-".into()),
                origin(a),
                a.model.to_string(),
                truncate(&a.description, 60),
            ]
        })
        .collect();
    print_table(&["NAME", "PERSONA", "SOURCE", "MODEL", "DESCRIPTION"], rows);
    Ok(())
}
