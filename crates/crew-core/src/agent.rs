use crate::frontmatter::{self, header_list, header_str};
use crate::paths;
use crate::persona::Persona;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Where a definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    User,
    Project,
    Plugin,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::User => "user",
            Scope::Project => "project",
            Scope::Plugin => "plugin",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ModelTier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    #[default]
    Sonnet,
    Opus,
    Haiku,
}

impl ModelTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Sonnet => "sonnet",
            ModelTier::Opus => "opus",
            ModelTier::Haiku => "haiku",
        }
    }

    /// Case-insensitive; anything unrecognised (including `inherit`) is the default tier.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
            Some("opus") => ModelTier::Opus,
            Some("haiku") => ModelTier::Haiku,
            _ => ModelTier::Sonnet,
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AgentSource
// ---------------------------------------------------------------------------

/// Provenance of an agent. Plugin agents carry the owning plugin's name;
/// local agents carry their user/project scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum AgentSource {
    Agent { scope: Scope },
    Plugin { plugin: String },
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub name: String,
    pub description: String,
    pub model: ModelTier,
    pub system_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(flatten)]
    pub source: AgentSource,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<Persona>,
}

impl Agent {
    /// Build an agent from raw file text. The identifier comes from the file
    /// stem, normalised to lowercase-with-hyphens.
    pub fn from_markdown(path: &Path, raw: &str, source: AgentSource) -> Self {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let doc = frontmatter::parse(raw);
        let header = &doc.header;

        Agent {
            name: paths::slugify(stem),
            description: header_str(header, "description").unwrap_or_default(),
            model: ModelTier::parse_or_default(header_str(header, "model").as_deref()),
            system_prompt: doc.body,
            color: header_str(header, "color").filter(|c| !c.trim().is_empty()),
            skills: header_list(header, "skills"),
            source,
            path: path.to_path_buf(),
            persona: None,
        }
    }

    pub fn scope(&self) -> Scope {
        match &self.source {
            AgentSource::Agent { scope } => *scope,
            AgentSource::Plugin { .. } => Scope::Plugin,
        }
    }

    pub fn plugin(&self) -> Option<&str> {
        match &self.source {
            AgentSource::Plugin { plugin } => Some(plugin),
            AgentSource::Agent { .. } => None,
        }
    }

    /// Display name when enriched, identifier otherwise.
    pub fn display_name(&self) -> &str {
        self.persona
            .as_ref()
            .map(|p| p.display_name.as_str())
            .unwrap_or(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
