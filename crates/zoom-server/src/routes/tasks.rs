use axum::extract::State;
use axum::Json;
use zoom_core::mutate::{complete_task, insert_task, reopen_task};
use zoom_core::{paths, FsStorage, Level, ZoomError};

use crate::error::AppError;
use crate::routes::projects_dir;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct AddTaskBody {
    /// Project file relative to the projects directory.
    pub file: String,
    pub level: Level,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(serde::Deserialize)]
pub struct TaskRefBody {
    pub file: String,
    pub description: String,
}

/// POST /api/tasks: insert a task at the end of a level section.
pub async fn add_task(
    State(app): State<AppState>,
    Json(body): Json<AddTaskBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let path = paths::resolve_in(&projects_dir(&root)?, &body.file)?;
        let line = insert_task(&FsStorage, &path, body.level, &body.description, body.completed)?;

        Ok::<_, ZoomError>(serde_json::json!({
            "file": body.file,
            "level": body.level,
            "line_index": line,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let _ = app.event_tx.send(());
    Ok(Json(result))
}

/// POST /api/tasks/complete: mark an open task done.
pub async fn complete(
    State(app): State<AppState>,
    Json(body): Json<TaskRefBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    set_completed(app, body, true).await
}

/// POST /api/tasks/reopen: mark a done task open again.
pub async fn reopen(
    State(app): State<AppState>,
    Json(body): Json<TaskRefBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    set_completed(app, body, false).await
}

async fn set_completed(
    app: AppState,
    body: TaskRefBody,
    completed: bool,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let path = paths::resolve_in(&projects_dir(&root)?, &body.file)?;
        let line = if completed {
            complete_task(&FsStorage, &path, &body.description)?
        } else {
            reopen_task(&FsStorage, &path, &body.description)?
        };

        Ok::<_, ZoomError>(serde_json::json!({
            "file": body.file,
            "description": body.description.trim(),
            "line_index": line,
            "completed": completed,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let _ = app.event_tx.send(());
    Ok(Json(result))
}
