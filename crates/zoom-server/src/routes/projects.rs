use axum::extract::{Path, State};
use axum::Json;
use zoom_core::aggregate::{aggregate, ProjectSummary};
use zoom_core::{FsStorage, ZoomError};

use crate::error::AppError;
use crate::routes::projects_dir;
use crate::state::AppState;

/// GET /api/projects: every project with counts and level-grouped tasks.
pub async fn list_projects(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let dir = projects_dir(&root)?;
        let agg = aggregate(&FsStorage, &dir)?;
        Ok::<_, ZoomError>(serde_json::json!({
            "projects": agg.projects,
            "warnings": agg.warnings,
            "totals": agg.totals(),
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/projects/:name: one project by its display name.
pub async fn get_project(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ProjectSummary>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let dir = projects_dir(&root)?;
        let agg = aggregate(&FsStorage, &dir)?;
        agg.project(&name)
            .cloned()
            .ok_or(ZoomError::ProjectNotFound(name))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
