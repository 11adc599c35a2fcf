use axum::extract::State;
use axum::Json;
use zoom_core::analysis::ProposedChange;

use crate::analysis::{apply, ApplyReport};
use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct ApplyBody {
    pub changes: Vec<ProposedChange>,
}

/// POST /api/changes/apply: apply reviewed LLM-proposed file changes.
///
/// Each change is reported as applied or skipped; one bad change does not
/// stop the others.
pub async fn apply_changes(
    State(app): State<AppState>,
    Json(body): Json<ApplyBody>,
) -> Result<Json<ApplyReport>, AppError> {
    let root = app.root.clone();
    let report = tokio::task::spawn_blocking(move || apply(&root, &body.changes))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    if report.applied() > 0 {
        let _ = app.event_tx.send(());
    }
    Ok(Json(report))
}
