use crate::agent::Agent;
use crate::error::{CrewError, Result};
use crate::extract::{extract_json_object, percent_field, string_field};

/// Descriptions are cut to this many characters before prompting.
pub const DESCRIPTION_LIMIT: usize = 200;

/// The fields Crew needs back from a persona request.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaReply {
    pub display_name: String,
    pub gender: String,
    pub tagline: String,
    pub beard_probability: u8,
    pub glasses_probability: u8,
}

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Persona request for `agent`, listing `taken` names to steer away from.
pub fn build_persona_prompt(agent: &Agent, taken: &[String]) -> String {
    let description = truncate_chars(agent.description.trim(), DESCRIPTION_LIMIT);
    let description = if description.is_empty() {
        "(no description)"
    } else {
        description
    };

    let mut prompt = format!(
        "You are casting a character for a trading card that represents an AI agent.\n\
         \n\
         Agent identifier: {name}\n\
         Agent description: {description}\n\
         \n\
         Invent a human persona for this agent. Reply with ONLY a JSON object:\n\
         {{\"displayName\": \"<first name, optionally a short surname>\", \
         \"gender\": \"male\" or \"female\", \
         \"tagline\": \"<catchy phrase under 60 characters>\", \
         \"beardProbability\": <0-100>, \
         \"glassesProbability\": <0-100>}}\n",
        name = agent.name,
    );

    if !taken.is_empty() {
        prompt.push_str(&format!(
            "\nThese display names are already taken; choose a different one: {}\n",
            taken.join(", ")
        ));
    }

    prompt
}

/// Pull a [`PersonaReply`] out of free text. `displayName` and `gender` are
/// required; everything else has a default.
pub fn parse_persona_reply(text: &str) -> Result<PersonaReply> {
    let obj = extract_json_object(text)
        .ok_or_else(|| CrewError::Extraction("no JSON object in reply".into()))?;

    let display_name = string_field(&obj, &["displayName", "display_name"])
        .ok_or_else(|| CrewError::Extraction("reply is missing displayName".into()))?;
    let gender = string_field(&obj, &["gender"])
        .ok_or_else(|| CrewError::Extraction("reply is missing gender".into()))?;

    Ok(PersonaReply {
        display_name,
        gender,
        tagline: string_field(&obj, &["tagline"]).unwrap_or_default(),
        beard_probability: percent_field(&obj, &["beardProbability", "beard_probability"]),
        glasses_probability: percent_field(&obj, &["glassesProbability", "glasses_probability"]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentSource, Scope};
    use std::path::Path;

    fn agent(description: &str) -> Agent {
        let raw = format!("---\ndescription: \"{description}\"\n---\nbody");
        Agent::from_markdown(
            Path::new("db-tuner.md"),
            &raw,
            AgentSource::Agent {
                scope: Scope::Project,
            },
        )
    }

    #[test]
    fn prompt_embeds_identifier_and_taken_names() {
        let prompt = build_persona_prompt(&agent("Tunes queries"), &["Alex".into(), "Sam".into()]);
        assert!(prompt.contains("Agent identifier: db-tuner"));
        assert!(prompt.contains("Agent description: Tunes queries"));
        assert!(prompt.contains("already taken; choose a different one: Alex, Sam"));
    }

    #[test]
    fn prompt_omits_taken_line_when_empty() {
        let prompt = build_persona_prompt(&agent("x"), &[]);
        assert!(!prompt.contains("already taken"));
    }

    #[test]
    fn prompt_truncates_long_descriptions() {
        let long = "é".repeat(500);
        let prompt = build_persona_prompt(&agent(&long), &[]);
        let line = prompt
            .lines()
            .find(|l| l.starts_with("Agent description: "))
            .unwrap();
        assert_eq!(
            line.trim_start_matches("Agent description: ").chars().count(),
            DESCRIPTION_LIMIT
        );
    }

    #[test]
    fn parses_reply_with_surrounding_prose() {
        let reply = parse_persona_reply(
            "Here you go!\n{\"displayName\": \"Nova Reyes\", \"gender\": \"F\", \"tagline\": \"Finds the slow query\", \"beardProbability\": 0, \"glassesProbability\": 65}\nHope that helps.",
        )
        .unwrap();
        assert_eq!(reply.display_name, "Nova Reyes");
        assert_eq!(reply.gender, "F");
        assert_eq!(reply.tagline, "Finds the slow query");
        assert_eq!(reply.glasses_probability, 65);
    }

    #[test]
    fn optional_fields_default() {
        let reply = parse_persona_reply(r#"{"displayName":"Kai","gender":"male"}"#).unwrap();
        assert_eq!(reply.tagline, "");
        assert_eq!(reply.beard_probability, 0);
        assert_eq!(reply.glasses_probability, 0);
    }

    #[test]
    fn missing_required_fields_are_errors() {
        assert!(matches!(
            parse_persona_reply(r#"{"gender":"male"}"#),
            Err(CrewError::Extraction(_))
        ));
        assert!(matches!(
            parse_persona_reply(r#"{"displayName":"Kai"}"#),
            Err(CrewError::Extraction(_))
        ));
        assert!(matches!(
            parse_persona_reply("no json here"),
            Err(CrewError::Extraction(_))
        ));
    }
}
