use axum::extract::State;
use axum::Json;
use zoom_core::config::Config;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/config: read-only view of `.zoom/config.yaml` plus validation
/// warnings.
pub async fn get_config(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let warnings = config.validate(&root);
        Ok::<_, zoom_core::ZoomError>(serde_json::json!({
            "config": config,
            "warnings": warnings,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use claude_agent::ScriptedClient;
    use std::sync::Arc;

    fn state(dir: &tempfile::TempDir) -> AppState {
        AppState::with_client(dir.path().to_path_buf(), Arc::new(ScriptedClient::new()))
    }

    #[tokio::test]
    async fn get_config_returns_error_when_not_initialized() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = get_config(State(state(&dir))).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn get_config_returns_config_and_warnings() {
        let dir = tempfile::TempDir::new().unwrap();
        Config::default().save(dir.path()).unwrap();

        let json = get_config(State(state(&dir))).await.unwrap().0;
        assert_eq!(json["config"]["version"], 1);
        assert_eq!(json["config"]["projects_dir"], "projects");
        // projects/ was never created
        assert_eq!(json["warnings"][0]["level"], "error");
    }
}
