//! LLM analysis wiring shared by the dashboard and the CLI.

use claude_agent::{AnthropicApi, ClaudeAgentError, ClaudeCli, LlmClient};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use zoom_core::analysis::{build_prompt, parse_response, Analysis, ProposedChange, SYSTEM_PROMPT};
use zoom_core::changes::{apply_changes, AppliedChange, ChangeOutcome};
use zoom_core::config::{Config, LlmBackend, LlmConfig};
use zoom_core::storage::FsStorage;
use zoom_core::{io, paths};

// ---------------------------------------------------------------------------
// Client construction
// ---------------------------------------------------------------------------

/// Build the configured backend. Fails only when the API backend's key
/// variable is unset.
pub fn client_from_config(cfg: &LlmConfig) -> claude_agent::Result<Arc<dyn LlmClient>> {
    match &cfg.backend {
        LlmBackend::ClaudeCli {
            model,
            path_to_executable,
        } => {
            let mut cli = ClaudeCli::new();
            if let Some(exe) = path_to_executable {
                cli = cli.with_executable(exe);
            }
            if let Some(model) = model {
                cli = cli.with_model(model);
            }
            Ok(Arc::new(cli))
        }
        LlmBackend::AnthropicApi {
            model,
            api_key_env,
            base_url,
            max_tokens,
        } => {
            let api = AnthropicApi::from_env(api_key_env, model)?
                .with_base_url(base_url)
                .with_max_tokens(*max_tokens);
            Ok(Arc::new(api))
        }
    }
}

/// Load the root's config, treating an uninitialized root as all defaults.
pub fn load_config_or_default(root: &Path) -> zoom_core::Result<Config> {
    match Config::load(root) {
        Ok(c) => Ok(c),
        Err(zoom_core::ZoomError::NotInitialized) => Ok(Config::default()),
        Err(e) => Err(e),
    }
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

/// Ask the model about `context` and interpret its reply.
///
/// Transport failures and timeouts are errors. A reply that is not usable
/// JSON is repaired where possible and otherwise returned verbatim as the
/// analysis text.
pub async fn analyze(
    client: &dyn LlmClient,
    prompt: &str,
    context: &str,
    timeout: Duration,
) -> claude_agent::Result<Analysis> {
    let request = build_prompt(prompt, context);
    let started = Instant::now();

    let reply = match tokio::time::timeout(timeout, client.complete(SYSTEM_PROMPT, &request)).await
    {
        Ok(reply) => reply?,
        Err(_) => {
            tracing::warn!(backend = client.name(), "analysis timed out after {}s", timeout.as_secs());
            return Err(ClaudeAgentError::Timeout(timeout.as_secs()));
        }
    };

    let analysis = parse_response(&reply);
    tracing::info!(
        backend = client.name(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        suggestions = analysis.suggestions.len(),
        proposed_changes = analysis.proposed_changes.len(),
        "analysis complete"
    );
    Ok(analysis)
}

// ---------------------------------------------------------------------------
// apply
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    pub results: Vec<AppliedChange>,
    /// Set when at least one file was snapshotted before being changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_dir: Option<String>,
}

impl ApplyReport {
    pub fn applied(&self) -> usize {
        self.results.iter().filter(|r| r.is_applied()).count()
    }
}

/// Apply proposed changes to the root's projects directory, snapshotting into
/// `.zoom/backups/<UTC stamp>/` when backups are enabled.
pub fn apply(root: &Path, changes: &[ProposedChange]) -> zoom_core::Result<ApplyReport> {
    let config = Config::load(root)?;
    let projects = config.projects_path(root);
    let snapshot_dir = config
        .backups
        .enabled
        .then(|| paths::backups_dir(root).join(io::snapshot_stamp(chrono::Utc::now())));

    let results = apply_changes(&FsStorage, &projects, snapshot_dir.as_deref(), changes)?;
    let snapshotted = results
        .iter()
        .any(|r| matches!(r.outcome, ChangeOutcome::Applied { backup: Some(_) }));

    Ok(ApplyReport {
        results,
        snapshot_dir: snapshot_dir
            .filter(|_| snapshotted)
            .map(|d| d.display().to_string()),
    })
}
