//! Drafting new agent definitions with Claude.

use crate::agent::ModelTier;
use crate::error::{CrewError, Result};
use crate::extract::{extract_json_object, string_field};
use crate::paths::{slugify, validate_name};
use serde_yaml::{Mapping, Value};

/// An agent definition proposed by Claude, not yet on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDraft {
    pub name: String,
    pub description: String,
    pub prompt: String,
}

pub fn build_authoring_prompt(request: &str) -> String {
    format!(
        "Design a Claude Code subagent for the following request:\n\
         \n\
         {request}\n\
         \n\
         Reply with ONLY a JSON object:\n\
         {{\"name\": \"<short lowercase-hyphenated identifier>\", \
         \"description\": \"<one or two sentences on when to use this agent>\", \
         \"prompt\": \"<the agent's full system prompt, written in the second person>\"}}\n",
        request = request.trim(),
    )
}

/// Pull an [`AgentDraft`] out of free text. The name is slugified and must
/// be a valid identifier afterwards.
pub fn parse_agent_draft(text: &str) -> Result<AgentDraft> {
    let obj = extract_json_object(text)
        .ok_or_else(|| CrewError::Extraction("no JSON object in reply".into()))?;
    let field = |key: &str| {
        string_field(&obj, &[key])
            .ok_or_else(|| CrewError::Extraction(format!("reply is missing {key}")))
    };

    let name = slugify(&field("name")?);
    validate_name(&name)?;

    Ok(AgentDraft {
        name,
        description: field("description")?,
        prompt: field("prompt")?,
    })
}

/// The markdown file for `draft`: YAML frontmatter then the prompt.
pub fn render_agent_file(draft: &AgentDraft, model: ModelTier, color: Option<&str>) -> Result<String> {
    let mut header = Mapping::new();
    header.insert("name".into(), Value::String(draft.name.clone()));
    header.insert("description".into(), Value::String(draft.description.clone()));
    header.insert("model".into(), Value::String(model.as_str().into()));
    if let Some(color) = color.map(str::trim).filter(|c| !c.is_empty()) {
        header.insert("color".into(), Value::String(color.into()));
    }
    let yaml = serde_yaml::to_string(&header)?;
    Ok(format!("---\n{yaml}---\n\n{}\n", draft.prompt.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, AgentSource, Scope};
    use std::path::Path;

    #[test]
    fn prompt_embeds_request() {
        let prompt = build_authoring_prompt("  an agent that reviews SQL migrations ");
        assert!(prompt.contains("\nan agent that reviews SQL migrations\n"));
        assert!(prompt.contains("\"prompt\""));
    }

    #[test]
    fn draft_name_is_slugified() {
        let draft = parse_agent_draft(
            "Here it is: {\"name\": \"SQL Migration Reviewer\", \"description\": \"Reviews migrations\", \"prompt\": \"You review.\"}",
        )
        .unwrap();
        assert_eq!(draft.name, "sql-migration-reviewer");
        assert_eq!(draft.prompt, "You review.");
    }

    #[test]
    fn draft_requires_all_fields() {
        let err = parse_agent_draft(r#"{"name": "x", "description": "d"}"#).unwrap_err();
        assert!(err.to_string().contains("prompt"));
        assert!(matches!(
            parse_agent_draft(r#"{"name": "!!!", "description": "d", "prompt": "p"}"#),
            Err(CrewError::InvalidName(_))
        ));
    }

    #[test]
    fn rendered_file_reads_back() {
        let draft = AgentDraft {
            name: "db-tuner".into(),
            description: "Use when: queries are slow <always>".into(),
            prompt: "You tune databases.\n".into(),
        };
        let text = render_agent_file(&draft, ModelTier::Opus, Some("blue")).unwrap();
        assert!(text.starts_with("---\n"));

        let agent = Agent::from_markdown(
            Path::new("db-tuner.md"),
            &text,
            AgentSource::Agent { scope: Scope::Project },
        );
        assert_eq!(agent.description, draft.description);
        assert_eq!(agent.model, ModelTier::Opus);
        assert_eq!(agent.color.as_deref(), Some("blue"));
        assert_eq!(agent.system_prompt, "You tune databases.");
    }
}
