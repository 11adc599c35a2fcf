use crate::error::{Result, ZoomError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// LlmBackend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LlmBackend {
    /// Shell out to the `claude` CLI in print mode.
    ClaudeCli {
        #[serde(default)]
        model: Option<String>,
        #[serde(default)]
        path_to_executable: Option<String>,
    },
    /// Call the Anthropic Messages API directly.
    AnthropicApi {
        #[serde(default = "default_api_model")]
        model: String,
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
        #[serde(default = "default_base_url")]
        base_url: String,
        #[serde(default = "default_max_tokens")]
        max_tokens: u32,
    },
}

fn default_api_model() -> String {
    "claude-sonnet-4-5".to_string()
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

impl LlmBackend {
    /// The API backend with every field at its default.
    pub fn anthropic_api() -> Self {
        LlmBackend::AnthropicApi {
            model: default_api_model(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for LlmBackend {
    fn default() -> Self {
        LlmBackend::ClaudeCli {
            model: None,
            path_to_executable: None,
        }
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub backend: LlmBackend,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// BackupConfig / ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Snapshot files into `.zoom/backups/` before applying AI-proposed changes.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3141
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Relative paths resolve against the root holding `.zoom/`.
    #[serde(default = "default_projects_dir")]
    pub projects_dir: PathBuf,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub backups: BackupConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_version() -> u32 {
    1
}

fn default_projects_dir() -> PathBuf {
    PathBuf::from(paths::DEFAULT_PROJECTS_DIR)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            projects_dir: default_projects_dir(),
            llm: LlmConfig::default(),
            backups: BackupConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(ZoomError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn projects_path(&self, root: &Path) -> PathBuf {
        if self.projects_dir.is_absolute() {
            self.projects_dir.clone()
        } else {
            root.join(&self.projects_dir)
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self, root: &Path) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let projects = self.projects_path(root);
        if !projects.is_dir() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("projects directory '{}' does not exist", projects.display()),
            });
        }

        if self.llm.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "llm.timeout_secs is 0; every analysis will time out".to_string(),
            });
        }

        match &self.llm.backend {
            LlmBackend::AnthropicApi {
                api_key_env,
                max_tokens,
                ..
            } => {
                if std::env::var(api_key_env).map(|v| v.is_empty()).unwrap_or(true) {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Warning,
                        message: format!("environment variable '{api_key_env}' is not set"),
                    });
                }
                if *max_tokens == 0 {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Error,
                        message: "llm.backend.max_tokens must be greater than 0".to_string(),
                    });
                }
            }
            LlmBackend::ClaudeCli { .. } => {}
        }

        if self.server.port == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "server.port is 0; the OS will pick a port".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_without_file_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()).unwrap_err(),
            ZoomError::NotInitialized
        ));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.projects_dir = PathBuf::from("life");
        cfg.server.port = 4000;
        cfg.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.projects_dir, PathBuf::from("life"));
        assert_eq!(loaded.server.port, 4000);
        assert_eq!(loaded.llm.backend, LlmBackend::default());
    }

    #[test]
    fn minimal_yaml_fills_defaults() {
        let cfg: Config = serde_yaml::from_str("version: 1\n").unwrap();
        assert_eq!(cfg.projects_dir, PathBuf::from("projects"));
        assert_eq!(cfg.llm.timeout_secs, 120);
        assert!(cfg.backups.enabled);
        assert_eq!(cfg.server.port, 3141);
    }

    #[test]
    fn api_backend_from_yaml() {
        let yaml = "llm:\n  backend:\n    type: anthropic_api\n    model: claude-haiku-4-5\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        match cfg.llm.backend {
            LlmBackend::AnthropicApi {
                model,
                api_key_env,
                max_tokens,
                ..
            } => {
                assert_eq!(model, "claude-haiku-4-5");
                assert_eq!(api_key_env, "ANTHROPIC_API_KEY");
                assert_eq!(max_tokens, 4096);
            }
            other => panic!("unexpected backend: {other:?}"),
        }
    }

    #[test]
    fn projects_path_resolves_relative_to_root() {
        let cfg = Config::default();
        assert_eq!(
            cfg.projects_path(Path::new("/home/me")),
            PathBuf::from("/home/me/projects")
        );
    }

    #[test]
    fn validate_flags_missing_projects_dir() {
        let dir = TempDir::new().unwrap();
        let warnings = Config::default().validate(dir.path());
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("projects directory")));

        std::fs::create_dir_all(dir.path().join("projects")).unwrap();
        assert!(Config::default().validate(dir.path()).is_empty());
    }

    #[test]
    fn validate_flags_zero_timeout() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("projects")).unwrap();
        let mut cfg = Config::default();
        cfg.llm.timeout_secs = 0;
        let warnings = cfg.validate(dir.path());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
    }
}
