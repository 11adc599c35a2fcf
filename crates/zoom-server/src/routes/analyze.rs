use axum::extract::State;
use axum::Json;
use std::time::Duration;
use zoom_core::analysis::{gather_context, Analysis};
use zoom_core::config::Config;
use zoom_core::{FsStorage, ZoomError};

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct AnalyzeBody {
    pub prompt: String,
    /// Restrict the context to one project and attach its files.
    #[serde(default)]
    pub project: Option<String>,
}

/// POST /api/analyze: ask the LLM about the current task tree.
///
/// Proposed changes are returned for review only; apply them with
/// `POST /api/changes/apply`.
pub async fn analyze(
    State(app): State<AppState>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Json<Analysis>, AppError> {
    let prompt = body.prompt.trim().to_string();
    if prompt.is_empty() {
        return Err(AppError::bad_request("prompt is required"));
    }

    let root = app.root.clone();
    let project = body.project.clone();
    let (context, llm_config) = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let dir = config.projects_path(&root);
        let context = gather_context(&FsStorage, &dir, project.as_deref())?;
        Ok::<_, ZoomError>((context, config.llm))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let client = app.llm_client(&llm_config)?;
    let timeout = Duration::from_secs(llm_config.timeout_secs);
    let analysis = crate::analysis::analyze(client.as_ref(), &prompt, &context, timeout).await?;
    Ok(Json(analysis))
}
