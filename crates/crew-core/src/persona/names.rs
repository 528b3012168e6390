use super::{Gender, Persona, PersonaOrigin};
use crate::agent::Agent;
use crate::avatar::{build_avatar_url, generate_traits};
use chrono::Utc;
use rand::rngs::OsRng;
use rand::Rng;
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Collision resolution
// ---------------------------------------------------------------------------

/// Return `candidate` if no taken name matches it (case-insensitively),
/// otherwise the first free `"<candidate> N"` for N = 2, 3, …
pub fn resolve_display_name(candidate: &str, taken: &[String]) -> String {
    let candidate = candidate.trim();
    let taken: HashSet<String> = taken.iter().map(|t| t.trim().to_lowercase()).collect();
    if !taken.contains(&candidate.to_lowercase()) {
        return candidate.to_string();
    }
    (2u32..)
        .map(|n| format!("{candidate} {n}"))
        .find(|name| !taken.contains(&name.to_lowercase()))
        .unwrap_or_else(|| candidate.to_string())
}

// ---------------------------------------------------------------------------
// Local synthesis
// ---------------------------------------------------------------------------

/// Name pairs (masculine, feminine) indexed by an identifier's first letter.
const NAMES_BY_LETTER: [(&str, &str); 26] = [
    ("Arlo", "Ada"),
    ("Bruno", "Bea"),
    ("Caspian", "Cleo"),
    ("Dax", "Daphne"),
    ("Elias", "Esme"),
    ("Felix", "Freya"),
    ("Gideon", "Greta"),
    ("Hugo", "Hazel"),
    ("Ivo", "Iris"),
    ("Jasper", "June"),
    ("Kai", "Kira"),
    ("Leo", "Luna"),
    ("Milo", "Maya"),
    ("Nico", "Nova"),
    ("Otto", "Olive"),
    ("Percy", "Pia"),
    ("Quentin", "Quinn"),
    ("Rafe", "Ruby"),
    ("Silas", "Sage"),
    ("Theo", "Tess"),
    ("Ulrich", "Uma"),
    ("Victor", "Vera"),
    ("Wes", "Wren"),
    ("Xavier", "Xena"),
    ("Yusuf", "Yara"),
    ("Zane", "Zoe"),
];

const FALLBACK_NAMES: (&str, &str) = ("Max", "Mia");

const TAGLINE_LIMIT: usize = 60;
const DEFAULT_TAGLINE: &str = "Ready for anything";

pub(crate) fn name_for(identifier: &str, gender: Gender) -> &'static str {
    let pair = identifier
        .chars()
        .next()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| NAMES_BY_LETTER[(c.to_ascii_lowercase() as u8 - b'a') as usize])
        .unwrap_or(FALLBACK_NAMES);
    match gender {
        Gender::Male => pair.0,
        Gender::Female => pair.1,
    }
}

/// First sentence of the description, capped at 60 characters.
pub(crate) fn tagline_from(description: &str) -> String {
    let sentence = description
        .split(['.', '!', '?', '\n'])
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_TAGLINE);
    if sentence.chars().count() <= TAGLINE_LIMIT {
        return sentence.to_string();
    }
    let mut cut: String = sentence.chars().take(TAGLINE_LIMIT - 1).collect();
    cut = cut.trim_end().to_string();
    cut.push('…');
    cut
}

/// Build a persona without Claude, keyed off the identifier's first letter.
pub fn synthesize_persona(agent: &Agent, taken: &[String], avatar_base_url: &str) -> Persona {
    let mut rng = OsRng;
    let gender = Gender::random();
    let display_name = resolve_display_name(name_for(&agent.name, gender), taken);
    let beard_probability = match gender {
        Gender::Male => rng.gen_range(0..=80),
        Gender::Female => 0,
    };
    let glasses_probability = rng.gen_range(0..=50);
    let avatar = generate_traits(gender, beard_probability, glasses_probability);
    let avatar_url = build_avatar_url(avatar_base_url, &agent.name, &avatar);

    Persona {
        display_name,
        gender,
        tagline: tagline_from(&agent.description),
        avatar,
        avatar_url,
        generated_at: Some(Utc::now()),
        source: PersonaOrigin::Local,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentSource, Scope};
    use crate::avatar::DEFAULT_BASE_URL;
    use std::path::Path;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn free_name_is_kept() {
        assert_eq!(resolve_display_name("Nova", &names(&["Alex", "Sam"])), "Nova");
    }

    #[test]
    fn collision_gets_numeric_suffix() {
        let taken = names(&["Alex", "Sam"]);
        assert_eq!(resolve_display_name("Alex", &taken), "Alex 2");
        let taken = names(&["Alex", "Sam", "Alex 2"]);
        assert_eq!(resolve_display_name("Alex", &taken), "Alex 3");
    }

    #[test]
    fn collision_is_case_insensitive() {
        assert_eq!(resolve_display_name("alex", &names(&["Alex"])), "alex 2");
    }

    #[test]
    fn name_for_uses_first_letter() {
        assert_eq!(name_for("kotlin-expert", Gender::Male), "Kai");
        assert_eq!(name_for("Kotlin", Gender::Female), "Kira");
        assert_eq!(name_for("3d-artist", Gender::Female), "Mia");
        assert_eq!(name_for("", Gender::Male), "Max");
    }

    #[test]
    fn tagline_takes_first_sentence() {
        assert_eq!(tagline_from("Reviews code. Also tests."), "Reviews code");
        assert_eq!(tagline_from(""), DEFAULT_TAGLINE);
        let long = "a".repeat(100);
        let t = tagline_from(&long);
        assert_eq!(t.chars().count(), TAGLINE_LIMIT);
        assert!(t.ends_with('…'));
    }

    #[test]
    fn synthesized_persona_avoids_taken_names() {
        let agent = Agent::from_markdown(
            Path::new("reviewer.md"),
            "---\ndescription: Reviews code. Thoroughly.\n---\n",
            AgentSource::Agent { scope: Scope::User },
        );
        let taken = names(&["Rafe", "Ruby"]);
        let p = synthesize_persona(&agent, &taken, DEFAULT_BASE_URL);
        assert!(p.display_name == "Rafe 2" || p.display_name == "Ruby 2");
        assert_eq!(p.tagline, "Reviews code");
        assert_eq!(p.source, PersonaOrigin::Local);
        assert!(p.avatar_url.contains("seed=reviewer"));
        if p.gender == Gender::Female {
            assert_eq!(p.avatar.beard_probability, 0);
        }
    }
}
