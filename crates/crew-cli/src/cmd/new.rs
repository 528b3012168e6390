use super::{load_config, runtime};
use crate::output::print_json;
use anyhow::Context;
use crew_core::agent::ModelTier;
use crew_core::authoring::{build_authoring_prompt, parse_agent_draft, render_agent_file};
use crew_core::io::write_if_missing;
use crew_core::{paths, CrewError};
use std::path::Path;

pub fn run(
    root: &Path,
    idea: &str,
    model: Option<&str>,
    color: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let opts = config.claude.print_options();
    if !claude_agent::is_available(&opts) {
        return Err(CrewError::ClaudeUnavailable(format!(
            "'{}' was not found; install Claude Code or set claude.executable in .claude/crew.yaml",
            config.claude.executable
        ))
        .into());
    }

    let rt = runtime()?;
    let reply = rt
        .block_on(claude_agent::print(build_authoring_prompt(idea), &opts))
        .context("claude failed to draft the agent")?;
    let draft = parse_agent_draft(&reply.text)?;

    let text = render_agent_file(&draft, ModelTier::parse_or_default(model), color)?;
    let path = paths::agent_file(root, &draft.name);
    if !write_if_missing(&path, text.as_bytes())? {
        return Err(CrewError::AgentExists(draft.name).into());
    }
    tracing::info!(agent = %draft.name, path = %path.display(), "agent created");

    if json {
        return print_json(&serde_json::json!({
            "name": draft.name,
            "description": draft.description,
            "path": path,
        }));
    }
    println!("Created {} at {}", draft.name, path.display());
    Ok(())
}
