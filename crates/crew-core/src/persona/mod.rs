//! Persona enrichment: AI-minted display names, taglines, and avatars.

pub mod enrich;
pub mod names;
pub mod reply;

use crate::avatar::AvatarTraits;
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use enrich::{ClaudeGenerator, EnrichOptions, EnrichReport, Enricher, OnFailure, TextGenerator};
pub use names::{resolve_display_name, synthesize_persona};
pub use reply::{build_persona_prompt, parse_persona_reply, PersonaReply};

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn random() -> Self {
        if OsRng.gen_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalise a free-text gender token. Unrecognised tokens pick uniformly
/// at random; this never fails.
pub fn validate_gender(token: &str) -> Gender {
    match token.trim().to_ascii_lowercase().as_str() {
        "m" | "male" | "man" | "masculine" | "boy" | "he" | "him" => Gender::Male,
        "f" | "female" | "woman" | "feminine" | "girl" | "she" | "her" => Gender::Female,
        other => {
            tracing::debug!(token = other, "unrecognised gender token; choosing randomly");
            Gender::random()
        }
    }
}

// ---------------------------------------------------------------------------
// Persona
// ---------------------------------------------------------------------------

/// Who minted a persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaOrigin {
    #[default]
    Claude,
    Local,
}

impl fmt::Display for PersonaOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PersonaOrigin::Claude => "claude",
            PersonaOrigin::Local => "local",
        })
    }
}

/// Cosmetic identity attached to an agent; also the metadata cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub display_name: String,
    pub gender: Gender,
    #[serde(default)]
    pub tagline: String,
    pub avatar: AvatarTraits,
    pub avatar_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: PersonaOrigin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_tokens_normalise() {
        assert_eq!(validate_gender("M"), Gender::Male);
        assert_eq!(validate_gender("Female"), Gender::Female);
        assert_eq!(validate_gender("  woman "), Gender::Female);
        assert_eq!(validate_gender("MALE"), Gender::Male);
    }

    #[test]
    fn unknown_gender_is_still_valid() {
        for _ in 0..20 {
            let g = validate_gender("x");
            assert!(matches!(g.as_str(), "male" | "female"));
        }
        let g = validate_gender("");
        assert!(g == Gender::Male || g == Gender::Female);
    }

    #[test]
    fn persona_reads_legacy_entries_without_new_fields() {
        let json = r#"{
            "displayName": "Nova",
            "gender": "female",
            "tagline": "Ships it",
            "avatar": {"hair":"variant04","body":"variant02","brows":"variant02","eyes":"variant03","lips":"variant05","nose":"variant02","glasses":"variant01","beardProbability":0,"glassesProbability":30},
            "avatarUrl": "https://example.com/a.png"
        }"#;
        let p: Persona = serde_json::from_str(json).unwrap();
        assert_eq!(p.display_name, "Nova");
        assert_eq!(p.gender, Gender::Female);
        assert_eq!(p.source, PersonaOrigin::Claude);
        assert!(p.generated_at.is_none());
        assert_eq!(p.avatar.glasses_probability, 30);
    }
}
