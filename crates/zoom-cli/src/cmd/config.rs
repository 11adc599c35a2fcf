use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;
use zoom_core::config::{Config, LlmBackend, WarnLevel};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Validate the config for common mistakes
    Validate,

    /// Choose the LLM backend used by `zoom analyze` and the dashboard
    SetBackend {
        /// Backend type: claude_cli or anthropic_api
        #[arg(long = "type", value_name = "TYPE")]
        backend_type: String,
        /// Model name
        #[arg(long)]
        model: Option<String>,
        /// Path to the claude executable (claude_cli)
        #[arg(long)]
        executable: Option<String>,
        /// Environment variable holding the API key (anthropic_api)
        #[arg(long)]
        api_key_env: Option<String>,
        /// Seconds to wait for a reply
        #[arg(long)]
        timeout: Option<u64>,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
        ConfigSubcommand::SetBackend {
            backend_type,
            model,
            executable,
            api_key_env,
            timeout,
        } => set_backend(root, &backend_type, model, executable, api_key_env, timeout),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;

    if json {
        return print_json(&config);
    }

    println!("Projects dir:  {}", config.projects_path(root).display());
    println!("LLM backend:   {}", backend_display(&config.llm.backend));
    println!("LLM timeout:   {}s", config.llm.timeout_secs);
    println!(
        "Backups:       {}",
        if config.backups.enabled {
            "enabled (.zoom/backups/)"
        } else {
            "disabled"
        }
    );
    println!("Server port:   {}", config.server.port);
    Ok(())
}

fn backend_display(backend: &LlmBackend) -> String {
    match backend {
        LlmBackend::ClaudeCli {
            model,
            path_to_executable,
        } => {
            let exe = path_to_executable.as_deref().unwrap_or("claude");
            match model {
                Some(m) => format!("claude_cli ({exe}, model: {m})"),
                None => format!("claude_cli ({exe})"),
            }
        }
        LlmBackend::AnthropicApi {
            model,
            api_key_env,
            ..
        } => format!("anthropic_api ({model}, key: ${api_key_env})"),
    }
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate(root);

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// set-backend
// ---------------------------------------------------------------------------

fn parse_backend(
    type_str: &str,
    model: Option<String>,
    executable: Option<String>,
    api_key_env: Option<String>,
) -> anyhow::Result<LlmBackend> {
    match type_str {
        "claude_cli" | "claude" => Ok(LlmBackend::ClaudeCli {
            model,
            path_to_executable: executable,
        }),
        "anthropic_api" | "api" => {
            let mut backend = LlmBackend::anthropic_api();
            if let LlmBackend::AnthropicApi {
                model: m,
                api_key_env: var,
                ..
            } = &mut backend
            {
                if let Some(model) = model {
                    *m = model;
                }
                if let Some(env) = api_key_env {
                    *var = env;
                }
            }
            Ok(backend)
        }
        other => {
            anyhow::bail!("unknown backend type '{other}'; valid: claude_cli, anthropic_api")
        }
    }
}

fn set_backend(
    root: &Path,
    backend_type: &str,
    model: Option<String>,
    executable: Option<String>,
    api_key_env: Option<String>,
    timeout: Option<u64>,
) -> anyhow::Result<()> {
    let mut config = Config::load(root).context("failed to load config")?;
    config.llm.backend = parse_backend(backend_type, model, executable, api_key_env)?;
    if let Some(secs) = timeout {
        config.llm.timeout_secs = secs;
    }
    config.save(root).context("failed to save config")?;
    println!(
        "LLM backend set to {}.",
        backend_display(&config.llm.backend)
    );
    Ok(())
}
