use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaudeAgentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Claude CLI not found: '{0}' is not on PATH")]
    NotInstalled(String),

    #[error("Failed to parse result envelope: {source}\n  output: {output}")]
    Parse {
        output: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Process error: {0}")]
    Process(String),

    #[error("Claude CLI did not finish within {0:?}")]
    Timeout(Duration),
}
