//! Avatar trait selection and DiceBear `notionists` request URLs.

use crate::persona::Gender;
use rand::rngs::OsRng;
use rand::Rng;
use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.dicebear.com/9.x/notionists/png";

/// Rendered avatar edge length in pixels.
pub const AVATAR_SIZE: u32 = 256;

// ---------------------------------------------------------------------------
// AvatarTraits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarTraits {
    pub hair: String,
    pub body: String,
    pub brows: String,
    pub eyes: String,
    pub lips: String,
    pub nose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glasses: Option<String>,
    #[serde(default)]
    pub beard_probability: u8,
    #[serde(default)]
    pub glasses_probability: u8,
}

// ---------------------------------------------------------------------------
// Trait pools
// ---------------------------------------------------------------------------

struct TraitPool {
    masculine: &'static [&'static str],
    feminine: &'static [&'static str],
    unisex: &'static [&'static str],
}

impl TraitPool {
    /// The gender's own pool plus the shared unisex pool.
    fn for_gender(&self, gender: Gender) -> Vec<&'static str> {
        let own = match gender {
            Gender::Male => self.masculine,
            Gender::Female => self.feminine,
        };
        own.iter().chain(self.unisex).copied().collect()
    }
}

const HAIR: TraitPool = TraitPool {
    masculine: &[
        "variant01", "variant02", "variant03", "variant05", "variant07", "variant10", "variant12",
        "variant14", "variant18", "variant21", "variant24", "variant27", "variant31", "variant35",
    ],
    feminine: &[
        "variant04", "variant06", "variant09", "variant11", "variant15", "variant19", "variant22",
        "variant26", "variant29", "variant33", "variant37", "variant42", "variant47", "variant53",
    ],
    unisex: &["variant08", "variant13", "variant40", "variant44", "variant58", "hat"],
};

const BODY: TraitPool = TraitPool {
    masculine: &["variant01", "variant03", "variant06", "variant09", "variant12", "variant17"],
    feminine: &["variant02", "variant05", "variant08", "variant14", "variant19", "variant23"],
    unisex: &["variant04", "variant10", "variant15", "variant20", "variant25"],
};

const BROWS: TraitPool = TraitPool {
    masculine: &["variant01", "variant04", "variant07", "variant10"],
    feminine: &["variant02", "variant05", "variant08", "variant11"],
    unisex: &["variant03", "variant06", "variant09", "variant12", "variant13"],
};

const EYES: TraitPool = TraitPool {
    masculine: &["variant01"],
    feminine: &["variant03"],
    unisex: &["variant02", "variant04", "variant05"],
};

const LIPS: TraitPool = TraitPool {
    masculine: &[
        "variant01", "variant04", "variant07", "variant10", "variant13", "variant16", "variant19",
    ],
    feminine: &[
        "variant02", "variant05", "variant08", "variant11", "variant14", "variant17", "variant20",
        "variant23", "variant26", "variant29",
    ],
    unisex: &["variant03", "variant06", "variant09", "variant12"],
};

const NOSE: TraitPool = TraitPool {
    masculine: &["variant01", "variant04", "variant07", "variant10", "variant13"],
    feminine: &["variant02", "variant05", "variant08", "variant11", "variant14"],
    unisex: &["variant03", "variant06", "variant09", "variant12", "variant15", "variant20"],
};

const BEARD: &[&str] = &[
    "variant01", "variant02", "variant03", "variant04", "variant05", "variant06", "variant07",
    "variant08", "variant09", "variant10", "variant11", "variant12",
];

const GLASSES: &[&str] = &[
    "variant01", "variant02", "variant03", "variant04", "variant05", "variant06", "variant07",
    "variant08", "variant09", "variant10", "variant11",
];

fn pick<R: Rng>(rng: &mut R, pool: &[&'static str]) -> String {
    pool[rng.gen_range(0..pool.len())].to_string()
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Select one variant per slot for `gender`.
///
/// Lips are asymmetric: feminine personas draw only from the feminine pool
/// while masculine personas draw from masculine ∪ feminine. Probabilities
/// are clamped to 0–100 and otherwise passed through untouched.
pub fn generate_traits(gender: Gender, beard_probability: u8, glasses_probability: u8) -> AvatarTraits {
    let mut rng = OsRng;

    let lips_pool: Vec<&'static str> = match gender {
        Gender::Female => LIPS.feminine.to_vec(),
        Gender::Male => LIPS.masculine.iter().chain(LIPS.feminine).copied().collect(),
    };

    AvatarTraits {
        hair: pick(&mut rng, &HAIR.for_gender(gender)),
        body: pick(&mut rng, &BODY.for_gender(gender)),
        brows: pick(&mut rng, &BROWS.for_gender(gender)),
        eyes: pick(&mut rng, &EYES.for_gender(gender)),
        lips: pick(&mut rng, &lips_pool),
        nose: pick(&mut rng, &NOSE.for_gender(gender)),
        beard: (gender == Gender::Male).then(|| pick(&mut rng, BEARD)),
        glasses: Some(pick(&mut rng, GLASSES)),
        beard_probability: beard_probability.min(100),
        glasses_probability: glasses_probability.min(100),
    }
}

// ---------------------------------------------------------------------------
// URL builder
// ---------------------------------------------------------------------------

/// Build the avatar service request for `seed` and `traits`. Pure: equal
/// inputs always produce an equal URL.
pub fn build_avatar_url(base_url: &str, seed: &str, traits: &AvatarTraits) -> String {
    let size = AVATAR_SIZE.to_string();
    let beard_probability = traits.beard_probability.to_string();
    let glasses_probability = traits.glasses_probability.to_string();
    let mut params: Vec<(&str, &str)> = vec![
        ("seed", seed),
        ("size", size.as_str()),
        ("hair", traits.hair.as_str()),
        ("body", traits.body.as_str()),
        ("brows", traits.brows.as_str()),
        ("eyes", traits.eyes.as_str()),
        ("lips", traits.lips.as_str()),
        ("nose", traits.nose.as_str()),
        ("gestureProbability", "0"),
    ];

    if traits.beard_probability > 0 {
        if let Some(beard) = &traits.beard {
            params.push(("beard", beard.as_str()));
            params.push(("beardProbability", beard_probability.as_str()));
        }
    }

    if let Some(glasses) = &traits.glasses {
        params.push(("glasses", glasses.as_str()));
    }
    params.push(("glassesProbability", glasses_probability.as_str()));

    let url = Url::parse_with_params(base_url, &params).or_else(|e| {
        tracing::warn!(base_url, error = %e, "invalid avatar base URL; using default");
        Url::parse_with_params(DEFAULT_BASE_URL, &params)
    });
    match url {
        Ok(url) => url.to_string(),
        // DEFAULT_BASE_URL is a valid absolute URL.
        Err(_) => DEFAULT_BASE_URL.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn traits(beard_probability: u8, glasses: Option<&str>) -> AvatarTraits {
        AvatarTraits {
            hair: "variant12".into(),
            body: "variant03".into(),
            brows: "variant01".into(),
            eyes: "variant02".into(),
            lips: "variant05".into(),
            nose: "variant09".into(),
            beard: Some("variant04".into()),
            glasses: glasses.map(str::to_string),
            beard_probability,
            glasses_probability: 40,
        }
    }

    #[test]
    fn url_is_pure() {
        let t = traits(80, Some("variant02"));
        let a = build_avatar_url(DEFAULT_BASE_URL, "code-reviewer", &t);
        let b = build_avatar_url(DEFAULT_BASE_URL, "code-reviewer", &t.clone());
        assert_eq!(a, b);
    }

    #[test]
    fn url_carries_every_slot() {
        let url = build_avatar_url(DEFAULT_BASE_URL, "qa", &traits(80, Some("variant02")));
        assert!(url.starts_with("https://api.dicebear.com/9.x/notionists/png?seed=qa&size=256"));
        for part in [
            "hair=variant12",
            "body=variant03",
            "brows=variant01",
            "eyes=variant02",
            "lips=variant05",
            "nose=variant09",
            "gestureProbability=0",
            "beard=variant04",
            "beardProbability=80",
            "glasses=variant02",
            "glassesProbability=40",
        ] {
            assert!(url.contains(part), "missing {part} in {url}");
        }
    }

    #[test]
    fn zero_beard_probability_omits_beard() {
        let url = build_avatar_url(DEFAULT_BASE_URL, "qa", &traits(0, Some("variant02")));
        assert!(!url.contains("beard"));
    }

    #[test]
    fn missing_glasses_omits_variant_but_keeps_probability() {
        let url = build_avatar_url(DEFAULT_BASE_URL, "qa", &traits(0, None));
        assert!(!url.contains("glasses="));
        assert!(url.contains("glassesProbability=40"));
    }

    #[test]
    fn seed_is_query_encoded() {
        let url = build_avatar_url(DEFAULT_BASE_URL, "Alex Kim & co", &traits(0, None));
        assert!(url.contains("seed=Alex+Kim+%26+co"));
    }

    #[test]
    fn invalid_base_url_uses_default() {
        let url = build_avatar_url("not a url", "qa", &traits(0, None));
        assert!(url.starts_with(DEFAULT_BASE_URL));
    }

    #[test]
    fn male_traits_draw_from_masculine_and_unisex_pools() {
        for _ in 0..50 {
            let t = generate_traits(Gender::Male, 70, 20);
            assert!(HAIR.for_gender(Gender::Male).contains(&t.hair.as_str()));
            assert!(BODY.for_gender(Gender::Male).contains(&t.body.as_str()));
            assert!(BEARD.contains(&t.beard.as_deref().unwrap()));
            assert!(LIPS.masculine.contains(&t.lips.as_str()) || LIPS.feminine.contains(&t.lips.as_str()));
            assert!(t.glasses.is_some());
            assert_eq!(t.beard_probability, 70);
            assert_eq!(t.glasses_probability, 20);
        }
    }

    #[test]
    fn female_traits_have_no_beard_and_feminine_lips() {
        for _ in 0..50 {
            let t = generate_traits(Gender::Female, 90, 0);
            assert!(t.beard.is_none());
            assert!(LIPS.feminine.contains(&t.lips.as_str()));
            assert!(NOSE.for_gender(Gender::Female).contains(&t.nose.as_str()));
            assert!(EYES.for_gender(Gender::Female).contains(&t.eyes.as_str()));
        }
    }

    #[test]
    fn probabilities_are_clamped() {
        let t = generate_traits(Gender::Male, 250, 101);
        assert_eq!(t.beard_probability, 100);
        assert_eq!(t.glasses_probability, 100);
    }

    #[test]
    fn traits_serialize_camel_case() {
        let json = serde_json::to_value(traits(10, None)).unwrap();
        assert_eq!(json["beardProbability"], 10);
        assert!(json.get("glasses").is_none());
    }
}
