use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::types::PrintOptions;
use crate::{ClaudeAgentError, Result};

// ─── Execution ────────────────────────────────────────────────────────────

/// Run `cmd` to completion, feeding `input` on stdin and returning stdout.
///
/// The child is spawned with `kill_on_drop`, so when `timeout` elapses the
/// pending wait is dropped and the process is killed. A non-zero exit is an
/// error carrying the captured stderr.
pub(crate) async fn execute(
    mut cmd: Command,
    input: &str,
    timeout: Option<Duration>,
) -> Result<String> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let program = cmd.as_std().get_program().to_string_lossy().into_owned();
    let mut child = cmd.spawn().map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ClaudeAgentError::NotInstalled(program),
        _ => ClaudeAgentError::Io(e),
    })?;

    // Feed stdin from a separate task so a chatty child can never deadlock
    // against a full stdout pipe.
    if let Some(mut stdin) = child.stdin.take() {
        let data = input.as_bytes().to_vec();
        tokio::spawn(async move {
            if let Err(e) = stdin.write_all(&data).await {
                tracing::debug!(error = %e, "failed to write prompt to stdin");
            }
            let _ = stdin.shutdown().await;
        });
    }

    let output = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(out) => out?,
            Err(_) => return Err(ClaudeAgentError::Timeout(limit)),
        },
        None => child.wait_with_output().await?,
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let msg = match output.status.code() {
            Some(code) if stderr.is_empty() => {
                format!("Claude CLI process exited with code {code}")
            }
            Some(code) => format!("Claude CLI process exited with code {code}\nstderr: {stderr}"),
            // Killed by signal (Unix)
            None if stderr.is_empty() => "Claude CLI process terminated by signal".to_string(),
            None => format!("Claude CLI process terminated by signal\nstderr: {stderr}"),
        };
        return Err(ClaudeAgentError::Process(msg));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

// ─── Command builder ──────────────────────────────────────────────────────

pub(crate) fn build_command(opts: &PrintOptions) -> Command {
    let mut cmd = Command::new(opts.executable());

    cmd.arg("--print").arg("--output-format").arg("json");

    if let Some(model) = &opts.model {
        cmd.arg("--model").arg(model);
    }

    if let Some(sp) = &opts.system_prompt {
        cmd.arg("--system-prompt").arg(sp);
    }

    if let Some(cwd) = &opts.cwd {
        cmd.current_dir(cwd);
    }

    // Allow calls from inside a running Claude session.
    cmd.env_remove("CLAUDECODE");
    for (k, v) in &opts.env {
        cmd.env(k, v);
    }

    // The prompt goes over stdin, never as a positional arg.
    cmd
}
