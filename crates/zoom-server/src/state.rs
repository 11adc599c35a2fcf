use claude_agent::LlmClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::broadcast;
use zoom_core::config::{Config, LlmConfig};
use zoom_core::storage::{FsStorage, Storage};

const WATCH_INTERVAL: Duration = Duration::from_millis(800);

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    /// Fixed client; `None` builds one from the config on every analysis.
    pub llm: Option<Arc<dyn LlmClient>>,
    pub event_tx: broadcast::Sender<()>,
}

impl AppState {
    /// State whose LLM backend follows `.zoom/config.yaml`. A backend that
    /// cannot be built only fails analysis requests.
    pub fn new(root: PathBuf) -> Self {
        Self::build(root, None)
    }

    pub fn with_client(root: PathBuf, llm: Arc<dyn LlmClient>) -> Self {
        Self::build(root, Some(llm))
    }

    /// The fixed client, or one built from `config`.
    pub fn llm_client(&self, config: &LlmConfig) -> claude_agent::Result<Arc<dyn LlmClient>> {
        match &self.llm {
            Some(client) => Ok(Arc::clone(client)),
            None => crate::analysis::client_from_config(config),
        }
    }

    /// Spawns the projects-directory watcher when called inside a Tokio runtime.
    fn build(root: PathBuf, llm: Option<Arc<dyn LlmClient>>) -> Self {
        let (tx, _) = broadcast::channel(64);
        let state = Self {
            root,
            llm,
            event_tx: tx.clone(),
        };

        // Poll the projects directory; dashboard writes and outside edits both
        // show up as a changed fingerprint.
        if tokio::runtime::Handle::try_current().is_ok() {
            let projects = Config::load(&state.root)
                .unwrap_or_default()
                .projects_path(&state.root);
            tokio::spawn(async move {
                let mut last = None::<Fingerprint>;
                loop {
                    tokio::time::sleep(WATCH_INTERVAL).await;
                    let dir = projects.clone();
                    let Ok(current) = tokio::task::spawn_blocking(move || fingerprint(&dir)).await
                    else {
                        continue;
                    };
                    if current.is_some() && current != last {
                        if last.is_some() {
                            tracing::debug!(dir = %projects.display(), "project files changed");
                            let _ = tx.send(());
                        }
                        last = current;
                    }
                }
            });
        }

        state
    }
}

/// Markdown file count plus newest mtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub files: usize,
    pub newest: Option<SystemTime>,
}

/// `None` when the directory cannot be listed.
pub fn fingerprint(dir: &Path) -> Option<Fingerprint> {
    let files = FsStorage.list_markdown_files(dir).ok()?.files;
    let newest = files
        .iter()
        .filter_map(|p| std::fs::metadata(p).and_then(|m| m.modified()).ok())
        .max();
    Some(Fingerprint {
        files: files.len(),
        newest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use claude_agent::{ClaudeAgentError, ScriptedClient};
    use zoom_core::config::LlmBackend;

    fn api_config(key_env: &str) -> LlmConfig {
        LlmConfig {
            backend: LlmBackend::AnthropicApi {
                model: "m".into(),
                api_key_env: key_env.into(),
                base_url: "http://localhost".into(),
                max_tokens: 10,
            },
            timeout_secs: 1,
        }
    }

    #[test]
    fn fixed_client_ignores_config() {
        let state = AppState::with_client(
            PathBuf::from("/tmp/test"),
            Arc::new(ScriptedClient::new()),
        );
        assert_eq!(state.root, PathBuf::from("/tmp/test"));
        let client = state
            .llm_client(&api_config("ZOOM_STATE_TEST_MISSING_KEY"))
            .unwrap();
        assert_eq!(client.name(), "scripted");
    }

    #[test]
    fn configured_client_is_built_per_request() {
        let state = AppState::new(PathBuf::from("/tmp/test"));
        assert!(state.llm.is_none());
        let err = state
            .llm_client(&api_config("ZOOM_STATE_TEST_MISSING_KEY"))
            .err();
        assert!(matches!(err, Some(ClaudeAgentError::MissingApiKey(_))));
        let cli = state.llm_client(&LlmConfig::default()).unwrap();
        assert_eq!(cli.name(), "claude-cli");
    }

    #[test]
    fn fingerprint_tracks_file_set() {
        let dir = tempfile::TempDir::new().unwrap();
        let empty = fingerprint(dir.path()).unwrap();
        assert_eq!(empty.files, 0);
        assert!(empty.newest.is_none());

        std::fs::write(dir.path().join("a.md"), "- [ ] a\n").unwrap();
        let one = fingerprint(dir.path()).unwrap();
        assert_eq!(one.files, 1);
        assert!(one.newest.is_some());
        assert_ne!(empty, one);

        assert!(fingerprint(&dir.path().join("missing")).is_none());
    }
}
