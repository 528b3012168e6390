//! Discovery of agent and skill definitions on disk.

use crate::agent::{Agent, AgentSource, Scope};
use crate::config::Config;
use crate::error::{CrewError, Result};
use crate::paths::{self, AGENTS_DIR, SKILLS_DIR};
use crate::skill::{find_skill_file, Skill};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory helpers
// ---------------------------------------------------------------------------

/// Entries of `dir` sorted by file name. A missing directory is empty; an
/// unreadable one is logged and treated as empty.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(vec![]);
    }
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %dir.display(), error = %e, "skipping unreadable directory");
            return Ok(vec![]);
        }
    };
    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    paths.sort();
    Ok(paths)
}

fn read_text(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
            None
        }
    }
}

fn is_markdown(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("md")
}

// ---------------------------------------------------------------------------
// Scanners
// ---------------------------------------------------------------------------

fn scan_agent_dir(dir: &Path, source: &AgentSource) -> Result<Vec<Agent>> {
    Ok(sorted_entries(dir)?
        .into_iter()
        .filter(|p| is_markdown(p))
        .filter_map(|p| {
            let raw = read_text(&p)?;
            Some(Agent::from_markdown(&p, &raw, source.clone()))
        })
        .collect())
}

/// Every `*.md` file directly inside `dir`.
pub fn scan_agents(dir: &Path, scope: Scope) -> Result<Vec<Agent>> {
    scan_agent_dir(dir, &AgentSource::Agent { scope })
}

/// Every subdirectory of `dir` that holds a `SKILL.md`.
pub fn scan_skills(dir: &Path, scope: Scope) -> Result<Vec<Skill>> {
    Ok(sorted_entries(dir)?
        .into_iter()
        .filter(|p| p.is_dir())
        .filter_map(|skill_dir| {
            let file = find_skill_file(&skill_dir)?;
            let raw = read_text(&file)?;
            Some(Skill::from_markdown(&skill_dir, &file, &raw, scope))
        })
        .collect())
}

/// Depth-first search for directories named `leaf`. Returns each match with
/// the name of the directory that contains it. Matches are not descended into,
/// and a directory reached twice through symlinks is searched once.
fn find_leaf_dirs(
    dir: &Path,
    leaf: &str,
    visited: &mut HashSet<PathBuf>,
    out: &mut Vec<(String, PathBuf)>,
) -> Result<()> {
    let canonical = std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    if !visited.insert(canonical) {
        tracing::debug!(path = %dir.display(), "directory already searched; skipping");
        return Ok(());
    }
    let owner = dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    for path in sorted_entries(dir)? {
        if !path.is_dir() {
            continue;
        }
        if path.file_name().and_then(|n| n.to_str()) == Some(leaf) {
            out.push((owner.clone(), path));
        } else {
            find_leaf_dirs(&path, leaf, visited, out)?;
        }
    }
    Ok(())
}

/// Agents from every `agents/` directory under `plugins_dir`, named after
/// the plugin directory that owns them.
pub fn scan_plugin_agents(plugins_dir: &Path) -> Result<Vec<Agent>> {
    let mut leaves = Vec::new();
    find_leaf_dirs(plugins_dir, AGENTS_DIR, &mut HashSet::new(), &mut leaves)?;
    let mut agents = Vec::new();
    for (plugin, dir) in leaves {
        agents.extend(scan_agent_dir(&dir, &AgentSource::Plugin { plugin })?);
    }
    Ok(agents)
}

/// Skills from every `skills/` directory under `plugins_dir`.
pub fn scan_plugin_skills(plugins_dir: &Path) -> Result<Vec<Skill>> {
    let mut leaves = Vec::new();
    find_leaf_dirs(plugins_dir, SKILLS_DIR, &mut HashSet::new(), &mut leaves)?;
    let mut skills = Vec::new();
    for (_, dir) in leaves {
        skills.extend(scan_skills(&dir, Scope::Plugin)?);
    }
    Ok(skills)
}

/// Concatenate `lists`, keeping only the first item seen for each key.
pub fn dedupe_first_seen<T>(lists: impl IntoIterator<Item = Vec<T>>, key: impl Fn(&T) -> &str) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in lists.into_iter().flatten() {
        if seen.insert(key(&item).to_string()) {
            out.push(item);
        } else {
            tracing::debug!(name = key(&item), "duplicate definition shadowed");
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// The set of locations agents and skills are read from.
///
/// `user_dir` and `project_dir` are `.claude`-style directories holding
/// `agents/` and `skills/`. `agents_dir`, when set, replaces both as the only
/// local agent source.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    pub user_dir: Option<PathBuf>,
    pub project_dir: Option<PathBuf>,
    pub plugins_dir: Option<PathBuf>,
    pub include_plugins: bool,
    pub agents_dir: Option<PathBuf>,
}

impl Repository {
    /// `~/.claude`, `<root>/.claude`, and `~/.claude/plugins` per `config`.
    pub fn for_root(root: &Path, config: &Config) -> Self {
        let user_dir = match paths::user_claude_dir() {
            Ok(dir) => Some(dir),
            Err(e) => {
                tracing::warn!(error = %e, "user-level definitions unavailable");
                None
            }
        };
        Repository {
            plugins_dir: user_dir.as_ref().map(|d| d.join(paths::PLUGINS_DIR)),
            user_dir,
            project_dir: Some(paths::project_claude_dir(root)),
            include_plugins: config.plugins.enabled,
            agents_dir: None,
        }
    }

    /// Only the agents directly inside `dir`.
    pub fn single_dir(dir: impl Into<PathBuf>) -> Self {
        Repository {
            agents_dir: Some(dir.into()),
            ..Repository::default()
        }
    }

    pub fn with_agents_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.agents_dir = Some(dir.into());
        self
    }

    pub fn with_plugins(mut self, include: bool) -> Self {
        self.include_plugins = include;
        self
    }

    fn plugins(&self) -> Option<&Path> {
        self.plugins_dir.as_deref().filter(|_| self.include_plugins)
    }

    fn user_agents(&self) -> Result<Vec<Agent>> {
        match (&self.agents_dir, &self.user_dir) {
            (None, Some(dir)) => scan_agents(&dir.join(AGENTS_DIR), Scope::User),
            _ => Ok(vec![]),
        }
    }

    fn project_agents(&self) -> Result<Vec<Agent>> {
        match (&self.agents_dir, &self.project_dir) {
            (Some(dir), _) => scan_agents(dir, Scope::Project),
            (None, Some(dir)) => scan_agents(&dir.join(AGENTS_DIR), Scope::Project),
            (None, None) => Ok(vec![]),
        }
    }

    fn plugin_agents(&self) -> Result<Vec<Agent>> {
        match self.plugins() {
            Some(dir) => scan_plugin_agents(dir),
            None => Ok(vec![]),
        }
    }

    /// All agents, user before project before plugin; first name wins.
    pub fn agents(&self) -> Result<Vec<Agent>> {
        let lists = vec![self.user_agents()?, self.project_agents()?, self.plugin_agents()?];
        Ok(dedupe_first_seen(lists, |a: &Agent| a.name.as_str()))
    }

    /// Look up one agent, preferring project over user over plugin.
    pub fn find_agent(&self, name: &str) -> Result<Agent> {
        for list in [self.project_agents()?, self.user_agents()?, self.plugin_agents()?] {
            if let Some(agent) = list.into_iter().find(|a| a.name == name) {
                return Ok(agent);
            }
        }
        Err(CrewError::AgentNotFound(name.to_string()))
    }

    fn skill_lists(&self, lookup_order: bool) -> Result<Vec<Vec<Skill>>> {
        let user = match &self.user_dir {
            Some(dir) => scan_skills(&dir.join(SKILLS_DIR), Scope::User)?,
            None => vec![],
        };
        let project = match &self.project_dir {
            Some(dir) => scan_skills(&dir.join(SKILLS_DIR), Scope::Project)?,
            None => vec![],
        };
        let plugin = match self.plugins() {
            Some(dir) => scan_plugin_skills(dir)?,
            None => vec![],
        };
        Ok(if lookup_order {
            vec![project, user, plugin]
        } else {
            vec![user, project, plugin]
        })
    }

    pub fn skills(&self) -> Result<Vec<Skill>> {
        Ok(dedupe_first_seen(self.skill_lists(false)?, |s: &Skill| s.name.as_str()))
    }

    pub fn find_skill(&self, name: &str) -> Result<Skill> {
        self.skill_lists(true)?
            .into_iter()
            .flatten()
            .find(|s| s.name == name)
            .ok_or_else(|| CrewError::SkillNotFound(name.to_string()))
    }
}
