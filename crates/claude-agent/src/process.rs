use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::types::CliResult;
use crate::{ClaudeAgentError, LlmClient, Result};

// ─── ClaudeCli ────────────────────────────────────────────────────────────

/// Runs the `claude` binary in print mode, one process per completion.
///
/// The prompt is written to stdin and the single JSON result object is read
/// from stdout. Stderr is captured and surfaced when the process fails.
#[derive(Debug, Clone)]
pub struct ClaudeCli {
    executable: String,
    model: Option<String>,
}

impl Default for ClaudeCli {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaudeCli {
    pub fn new() -> Self {
        Self {
            executable: "claude".to_string(),
            model: None,
        }
    }

    pub fn with_executable(mut self, path: impl Into<String>) -> Self {
        self.executable = path.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    fn build_command(&self, system: &str) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("--print").arg("--output-format").arg("json");

        if let Some(model) = &self.model {
            cmd.arg("--model").arg(model);
        }

        if !system.is_empty() {
            cmd.arg("--system-prompt").arg(system);
        }

        // Works from a terminal and from inside a running Claude session.
        cmd.env_remove("CLAUDECODE");

        // NOTE: prompt is NOT a positional arg; it's sent via stdin
        cmd
    }
}

#[async_trait]
impl LlmClient for ClaudeCli {
    fn name(&self) -> &str {
        "claude-cli"
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        tracing::debug!(exe = %self.executable, model = ?self.model, "spawning claude");
        let stdout = run_command(self.build_command(system), prompt).await?;
        parse_cli_output(&stdout)
    }
}

/// Spawn `cmd`, feed `prompt` on stdin, and return stdout once it exits.
pub(crate) async fn run_command(mut cmd: Command, prompt: &str) -> Result<String> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(ClaudeAgentError::Io)?;

    if let Some(mut stdin) = child.stdin.take() {
        // A process that exits without reading stdin reports through its exit
        // status below, so a broken pipe here is not the error to surface.
        match stdin.write_all(prompt.as_bytes()).await {
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                tracing::debug!("claude closed stdin before reading the prompt");
            }
            other => other?,
        }
    }

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(exit_error(output.status, stderr.trim()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Build the error for a failed process, including captured stderr.
fn exit_error(status: ExitStatus, stderr: &str) -> ClaudeAgentError {
    let head = match status.code() {
        Some(code) => format!("claude process exited with code {code}"),
        None => "claude process terminated by signal".to_string(),
    };
    if stderr.is_empty() {
        ClaudeAgentError::Process(head)
    } else {
        ClaudeAgentError::Process(format!("{head}\nstderr: {stderr}"))
    }
}

/// Pull the completion text out of the CLI's JSON result object.
pub(crate) fn parse_cli_output(stdout: &str) -> Result<String> {
    let trimmed = stdout.trim();
    let result: CliResult =
        serde_json::from_str(trimmed).map_err(|source| ClaudeAgentError::Parse {
            output: trimmed.to_string(),
            source,
        })?;

    if result.is_error {
        let detail = result
            .result
            .or(result.subtype)
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(ClaudeAgentError::ErrorResult(detail));
    }
    Ok(result.result.unwrap_or_default())
}
