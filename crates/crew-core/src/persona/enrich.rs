use super::names::{resolve_display_name, synthesize_persona};
use super::reply::{build_persona_prompt, parse_persona_reply};
use super::{validate_gender, Persona, PersonaOrigin};
use crate::agent::Agent;
use crate::avatar::{build_avatar_url, generate_traits};
use crate::cache::{CacheStore, MetadataCache};
use crate::error::{CrewError, Result};
use chrono::Utc;
use claude_agent::PrintOptions;
use serde::Serialize;
use std::future::Future;

// ---------------------------------------------------------------------------
// TextGenerator
// ---------------------------------------------------------------------------

/// A source of free-text completions.
pub trait TextGenerator {
    fn is_available(&self) -> bool;
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// [`TextGenerator`] backed by the `claude` CLI.
#[derive(Debug, Clone)]
pub struct ClaudeGenerator {
    opts: PrintOptions,
}

impl ClaudeGenerator {
    pub fn new(opts: PrintOptions) -> Self {
        Self { opts }
    }
}

impl TextGenerator for ClaudeGenerator {
    fn is_available(&self) -> bool {
        claude_agent::is_available(&self.opts)
    }

    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send {
        let opts = self.opts.clone();
        let prompt = prompt.to_string();
        async move {
            let reply = claude_agent::print(prompt, &opts).await?;
            Ok(reply.text)
        }
    }
}

// ---------------------------------------------------------------------------
// Options / report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Fall back to a locally synthesized persona and keep going.
    Synthesize,
    /// Abort the batch with the first error.
    Propagate,
}

#[derive(Debug, Clone)]
pub struct EnrichOptions {
    pub avatar_base_url: String,
    /// List persisted display names in the prompt, not only this run's.
    pub hint_persisted_names: bool,
    pub on_failure: OnFailure,
}

impl EnrichOptions {
    /// CLI behaviour: never abort the batch.
    pub fn lenient(avatar_base_url: impl Into<String>) -> Self {
        Self {
            avatar_base_url: avatar_base_url.into(),
            hint_persisted_names: false,
            on_failure: OnFailure::Synthesize,
        }
    }

    /// Server behaviour: Claude must be present and every call must succeed.
    pub fn strict(avatar_base_url: impl Into<String>) -> Self {
        Self {
            avatar_base_url: avatar_base_url.into(),
            hint_persisted_names: true,
            on_failure: OnFailure::Propagate,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichReport {
    pub generated: usize,
    pub synthesized: usize,
    pub cached: usize,
}

// ---------------------------------------------------------------------------
// Enricher
// ---------------------------------------------------------------------------

pub struct Enricher<'a, G> {
    generator: &'a G,
    options: EnrichOptions,
}

impl<'a, G: TextGenerator + Sync> Enricher<'a, G> {
    pub fn new(generator: &'a G, options: EnrichOptions) -> Self {
        Self { generator, options }
    }

    /// Attach a persona to every agent, generating and caching the missing ones.
    ///
    /// Agents are processed strictly one at a time: each request sees every
    /// name claimed before it, and each new persona is written through the
    /// cache before the next agent starts.
    pub async fn enrich_all<S: CacheStore>(
        &self,
        agents: &mut [Agent],
        cache: &mut MetadataCache<S>,
    ) -> Result<EnrichReport> {
        let mut report = EnrichReport::default();

        let available = self.generator.is_available();
        if !available {
            if self.options.on_failure == OnFailure::Propagate {
                return Err(CrewError::ClaudeUnavailable(
                    "the claude executable could not be found".into(),
                ));
            }
            tracing::warn!("Claude CLI not available; synthesizing personas locally");
        }

        let mut claimed: Vec<String> = Vec::new();

        for agent in agents.iter_mut() {
            if let Some(existing) = cache.get(&agent.name) {
                agent.persona = Some(existing.clone());
                report.cached += 1;
                continue;
            }

            let mut taken = cache.display_names();
            for name in &claimed {
                if !taken.contains(name) {
                    taken.push(name.clone());
                }
            }

            let persona = if available {
                let hint = if self.options.hint_persisted_names {
                    &taken
                } else {
                    &claimed
                };
                match self.generate_one(agent, hint, &taken).await {
                    Ok(p) => {
                        report.generated += 1;
                        p
                    }
                    Err(e) if self.options.on_failure == OnFailure::Synthesize => {
                        tracing::warn!(agent = %agent.name, error = %e, "persona generation failed; synthesizing locally");
                        report.synthesized += 1;
                        synthesize_persona(agent, &taken, &self.options.avatar_base_url)
                    }
                    Err(e) => return Err(e),
                }
            } else {
                report.synthesized += 1;
                synthesize_persona(agent, &taken, &self.options.avatar_base_url)
            };

            tracing::info!(agent = %agent.name, display_name = %persona.display_name, "persona created");
            cache.set(&agent.name, persona.clone())?;
            claimed.push(persona.display_name.clone());
            agent.persona = Some(persona);
        }

        Ok(report)
    }

    async fn generate_one(&self, agent: &Agent, hint: &[String], taken: &[String]) -> Result<Persona> {
        let generation_error = |message: String| CrewError::Generation {
            agent: agent.name.clone(),
            message,
        };

        let prompt = build_persona_prompt(agent, hint);
        let text = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| generation_error(e.to_string()))?;
        let reply = parse_persona_reply(&text).map_err(|e| generation_error(e.to_string()))?;

        let gender = validate_gender(&reply.gender);
        let display_name = resolve_display_name(&reply.display_name, taken);
        let avatar = generate_traits(gender, reply.beard_probability, reply.glasses_probability);
        let avatar_url = build_avatar_url(&self.options.avatar_base_url, &agent.name, &avatar);

        Ok(Persona {
            display_name,
            gender,
            tagline: reply.tagline,
            avatar,
            avatar_url,
            generated_at: Some(Utc::now()),
            source: PersonaOrigin::Claude,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
