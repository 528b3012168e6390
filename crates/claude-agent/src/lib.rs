//! `claude-agent`: one-shot Rust driver for the Claude CLI subprocess.
//!
//! Crew only ever needs a single request/response exchange with Claude, so
//! this crate wraps `claude --print --output-format json` rather than the
//! streaming protocol.
//!
//! # Architecture
//!
//! ```text
//! PrintOptions
//!     │
//!     ▼
//! build_command   ← `claude --print --output-format json [--model …]`
//!     │
//!     ▼
//! execute         ← prompt on stdin, stdout/stderr captured,
//!     │              wall-clock timeout kills a hung child
//!     ▼
//! PrintResult     ← result envelope unwrapped (plain text tolerated)
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use claude_agent::{print, PrintOptions};
//!
//! let opts = PrintOptions {
//!     model: Some("haiku".into()),
//!     timeout: Some(std::time::Duration::from_secs(60)),
//!     ..Default::default()
//! };
//! let reply = print("Reply with a JSON object.", &opts).await?;
//! println!("{}", reply.text);
//! ```

pub mod error;
pub mod types;

pub(crate) mod process;


pub use error::ClaudeAgentError;
pub use types::{PrintOptions, PrintResult, ResultEnvelope};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ClaudeAgentError>;

/// Send `prompt` to the Claude CLI and wait for the final answer.
///
/// Fails with [`ClaudeAgentError::NotInstalled`] when the binary cannot be
/// spawned, [`ClaudeAgentError::Timeout`] when `opts.timeout` elapses, and
/// [`ClaudeAgentError::Process`] on a non-zero exit or an error envelope.
pub async fn print(prompt: impl Into<String>, opts: &PrintOptions) -> Result<PrintResult> {
    let prompt = prompt.into();
    let cmd = process::build_command(opts);
    tracing::debug!(
        executable = opts.executable(),
        model = opts.model.as_deref().unwrap_or("default"),
        prompt_len = prompt.len(),
        "spawning claude --print"
    );
    let stdout = process::execute(cmd, &prompt, opts.timeout).await?;
    PrintResult::from_stdout(&stdout)
}

/// Whether the configured executable resolves on `PATH` (or as a path).
pub fn is_available(opts: &PrintOptions) -> bool {
    which::which(opts.executable()).is_ok()
}
