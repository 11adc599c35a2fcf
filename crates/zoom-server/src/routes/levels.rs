use axum::extract::{Path, Query, State};
use axum::Json;
use zoom_core::aggregate::aggregate;
use zoom_core::{FsStorage, Level, ZoomError};

use crate::error::AppError;
use crate::routes::projects_dir;
use crate::state::AppState;

#[derive(serde::Deserialize, Default)]
pub struct LevelQuery {
    /// Hide completed tasks.
    #[serde(default)]
    pub open: bool,
}

/// GET /api/levels/:level: one zoom level across all projects.
pub async fn get_level(
    State(app): State<AppState>,
    Path(level): Path<String>,
    Query(query): Query<LevelQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let level: Level = level.parse()?;
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let dir = projects_dir(&root)?;
        let agg = aggregate(&FsStorage, &dir)?;
        let tasks = agg.tasks_at_level(level, query.open);
        Ok::<_, ZoomError>(serde_json::json!({
            "level": level,
            "heading": level.heading(),
            "tasks": tasks,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
