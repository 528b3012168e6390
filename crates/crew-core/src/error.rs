use claude_agent::ClaudeAgentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrewError {
    #[error("no agents found in {0}")]
    NoAgents(String),

    #[error("agent not found: {0}")]
    AgentNotFound(String),

    #[error("agent already exists: {0}")]
    AgentExists(String),

    #[error("skill not found: {0}")]
    SkillNotFound(String),

    #[error("invalid agent name '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidName(String),

    #[error("Claude CLI unavailable: {0}")]
    ClaudeUnavailable(String),

    #[error("persona generation failed for '{agent}': {message}")]
    Generation { agent: String, message: String },

    #[error("unusable reply from Claude: {0}")]
    Extraction(String),

    #[error("render failed: {0}")]
    Render(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Claude(#[from] ClaudeAgentError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CrewError>;
