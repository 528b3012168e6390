use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::{ClaudeAgentError, Result};

// ─── PrintOptions ─────────────────────────────────────────────────────────

/// Options for a single `claude --print` invocation.
#[derive(Debug, Clone, Default)]
pub struct PrintOptions {
    /// Claude model name or alias (e.g. `"haiku"`)
    pub model: Option<String>,
    /// Override system prompt
    pub system_prompt: Option<String>,
    /// Custom path to the `claude` binary (default: `"claude"`)
    pub path_to_executable: Option<String>,
    /// Wall-clock limit for the whole call. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Working directory for the subprocess (default: current dir)
    pub cwd: Option<PathBuf>,
    /// Additional environment variables for the subprocess
    pub env: HashMap<String, String>,
}

impl PrintOptions {
    pub fn executable(&self) -> &str {
        self.path_to_executable.as_deref().unwrap_or("claude")
    }
}

// ─── ResultEnvelope ───────────────────────────────────────────────────────

/// The single JSON object printed by `claude --print --output-format json`.
///
/// Only the fields this crate reads are modelled; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub total_cost_usd: f64,
    #[serde(default)]
    pub num_turns: u32,
    #[serde(default)]
    pub duration_ms: u64,
}

// ─── PrintResult ──────────────────────────────────────────────────────────

/// The outcome of a successful one-shot call.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintResult {
    /// The final text Claude produced.
    pub text: String,
    pub session_id: Option<String>,
    pub total_cost_usd: f64,
    pub num_turns: u32,
}

impl PrintResult {
    /// Interpret captured stdout.
    ///
    /// A `{"type":"result",…}` envelope is unwrapped; anything else is taken
    /// as plain text (e.g. when the binary ignores `--output-format`).
    pub fn from_stdout(stdout: &str) -> Result<Self> {
        let trimmed = stdout.trim();
        if trimmed.is_empty() {
            return Err(ClaudeAgentError::Process(
                "Claude CLI produced no output".into(),
            ));
        }

        if !is_result_envelope(trimmed) {
            return Ok(Self {
                text: trimmed.to_string(),
                session_id: None,
                total_cost_usd: 0.0,
                num_turns: 0,
            });
        }

        let envelope: ResultEnvelope =
            serde_json::from_str(trimmed).map_err(|e| ClaudeAgentError::Parse {
                output: trimmed.to_string(),
                source: e,
            })?;

        if envelope.is_error {
            let subtype = envelope.subtype.as_deref().unwrap_or("error");
            let detail = envelope.result.as_deref().unwrap_or("");
            return Err(ClaudeAgentError::Process(format!(
                "Claude reported {subtype}: {detail}"
            )));
        }

        Ok(Self {
            text: envelope.result.unwrap_or_default(),
            session_id: envelope.session_id,
            total_cost_usd: envelope.total_cost_usd,
            num_turns: envelope.num_turns,
        })
    }
}

fn is_result_envelope(text: &str) -> bool {
    if !text.starts_with('{') {
        return false;
    }
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| v.get("type").and_then(|t| t.as_str()).map(|t| t == "result"))
        .unwrap_or(false)
}
