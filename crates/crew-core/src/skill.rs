use crate::agent::Scope;
use crate::frontmatter::{self, header_list, header_str};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

/// A `SKILL.md` definition living in its own directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub allowed_tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<String>,
    #[serde(default)]
    pub metadata: Mapping,
    pub prompt: String,
    pub scope: Scope,
    pub path: PathBuf,
}

impl Skill {
    /// `dir` is the skill directory; `file` the `SKILL.md` inside it.
    /// The frontmatter `name` wins over the directory name.
    pub fn from_markdown(dir: &Path, file: &Path, raw: &str, scope: Scope) -> Self {
        let doc = frontmatter::parse(raw);
        let header = &doc.header;

        let dir_name = dir
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        let mut allowed_tools = header_list(header, "allowed-tools");
        if allowed_tools.is_empty() {
            allowed_tools = header_list(header, "tools");
        }

        let metadata = match header.get("metadata") {
            Some(Value::Mapping(m)) => m.clone(),
            _ => Mapping::new(),
        };

        Skill {
            name: header_str(header, "name")
                .filter(|n| !n.trim().is_empty())
                .unwrap_or(dir_name),
            description: header_str(header, "description").unwrap_or_default(),
            allowed_tools,
            license: header_str(header, "license"),
            compatibility: header_str(header, "compatibility"),
            metadata,
            prompt: doc.body,
            scope,
            path: file.to_path_buf(),
        }
    }
}

/// Find `SKILL.md` inside `dir`, matching the file name case-insensitively.
pub fn find_skill_file(dir: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.eq_ignore_ascii_case("skill.md"))
        })
        .collect();
    // Prefer the canonical spelling when several variants coexist.
    candidates.sort_by_key(|p| p.file_name().map(|n| n != "SKILL.md"));
    candidates.into_iter().next()
}
