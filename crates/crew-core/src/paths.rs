use crate::error::{CrewError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CLAUDE_DIR: &str = ".claude";
pub const AGENTS_DIR: &str = "agents";
pub const SKILLS_DIR: &str = "skills";
pub const PLUGINS_DIR: &str = "plugins";

pub const CONFIG_FILE: &str = ".claude/crew.yaml";
pub const METADATA_FILE: &str = ".claude/crew-metadata.json";

// ---------------------------------------------------------------------------
// Project-scoped paths
// ---------------------------------------------------------------------------

pub fn project_claude_dir(root: &Path) -> PathBuf {
    root.join(CLAUDE_DIR)
}

pub fn project_agents_dir(root: &Path) -> PathBuf {
    project_claude_dir(root).join(AGENTS_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn agent_file(root: &Path, name: &str) -> PathBuf {
    project_agents_dir(root).join(format!("{name}.md"))
}

// ---------------------------------------------------------------------------
// User-scoped paths (~/.claude)
// ---------------------------------------------------------------------------

pub fn user_claude_dir() -> Result<PathBuf> {
    home::home_dir()
        .map(|h| h.join(CLAUDE_DIR))
        .ok_or(CrewError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Agent identifiers
// ---------------------------------------------------------------------------

/// Turn a file stem or free-form title into an agent identifier:
/// lowercase ASCII alphanumerics separated by single hyphens.
pub fn slugify(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_dash = false;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").expect("static regex")
    })
}

pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 64 || !name_re().is_match(name) {
        return Err(CrewError::InvalidName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
