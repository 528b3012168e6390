use super::{load_config, repository, runtime};
use crate::output::print_json;
use anyhow::Context;
use crew_core::cache::MetadataCache;
use crew_core::card::{avatar_client, load_avatars, render_cards};
use crew_core::io::atomic_write;
use crew_core::persona::{ClaudeGenerator, EnrichOptions, Enricher};
use crew_core::CrewError;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub fn run(
    root: &Path,
    output: Option<PathBuf>,
    agents_dir: Option<PathBuf>,
    no_plugins: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let searched = match &agents_dir {
        Some(dir) => dir.display().to_string(),
        None => "~/.claude/agents or .claude/agents".to_string(),
    };
    let mut agents = repository(root, &config, agents_dir, no_plugins)
        .agents()
        .context("failed to scan agents")?;
    if agents.is_empty() {
        return Err(CrewError::NoAgents(searched).into());
    }

    let output = output.unwrap_or_else(|| config.output_path(root));
    let generator = ClaudeGenerator::new(config.claude.print_options());
    let mut cache = MetadataCache::open(root, &config);

    let rt = runtime()?;
    let (report, avatars) = rt.block_on(async {
        let options = EnrichOptions::lenient(config.avatar.base_url.clone());
        let report = Enricher::new(&generator, options)
            .enrich_all(&mut agents, &mut cache)
            .await?;
        let client = avatar_client(Duration::from_secs(config.avatar.fetch_timeout_secs));
        let avatars = load_avatars(&agents, &client).await;
        anyhow::Ok((report, avatars))
    })?;

    let png = render_cards(&agents, &avatars)?;
    atomic_write(&output, &png).with_context(|| format!("failed to write {}", output.display()))?;

    if json {
        let cards: Vec<serde_json::Value> = agents
            .iter()
            .map(|a| serde_json::json!({ "name": a.name, "displayName": a.display_name() }))
            .collect();
        print_json(&serde_json::json!({
            "output": output,
            "report": report,
            "cards": cards,
        }))?;
        return Ok(());
    }

    println!(
        "Enriched {} agents ({} generated, {} synthesized locally, {} cached)",
        agents.len(),
        report.generated,
        report.synthesized,
        report.cached
    );
    println!("Wrote {}", output.display());
    Ok(())
}
