use crate::analysis::{ChangeType, ProposedChange};
use crate::error::{Result, ZoomError};
use crate::io::snapshot_file;
use crate::paths::{self, MARKDOWN_EXT};
use crate::storage::Storage;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChangeOutcome {
    Applied {
        #[serde(skip_serializing_if = "Option::is_none")]
        backup: Option<String>,
    },
    Skipped {
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct AppliedChange {
    pub file_path: String,
    pub change_type: ChangeType,
    #[serde(flatten)]
    pub outcome: ChangeOutcome,
}

impl AppliedChange {
    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, ChangeOutcome::Applied { .. })
    }
}

fn skipped(change: &ProposedChange, reason: impl Into<String>) -> AppliedChange {
    AppliedChange {
        file_path: change.file_path.clone(),
        change_type: change.change_type,
        outcome: ChangeOutcome::Skipped {
            reason: reason.into(),
        },
    }
}

/// Apply model-proposed file changes inside `projects_dir`.
///
/// Changes that cannot be applied safely are reported as skipped rather than
/// failing the batch: paths outside `projects_dir`, non-markdown files,
/// creates over existing files, updates or deletes of missing files, and
/// updates that carry only a diff. When `snapshot_dir` is set, files are copied
/// there before being overwritten or deleted. I/O errors abort immediately.
pub fn apply_changes(
    storage: &impl Storage,
    projects_dir: &Path,
    snapshot_dir: Option<&Path>,
    changes: &[ProposedChange],
) -> Result<Vec<AppliedChange>> {
    let mut results = Vec::with_capacity(changes.len());
    for change in changes {
        let path = match paths::resolve_in(projects_dir, &change.file_path) {
            Ok(p) => p,
            Err(ZoomError::InvalidPath(_)) => {
                results.push(skipped(change, "path is outside the projects directory"));
                continue;
            }
            Err(e) => return Err(e),
        };
        let is_md = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(MARKDOWN_EXT));
        if !is_md {
            results.push(skipped(change, "only markdown files can be changed"));
            continue;
        }

        let exists = storage.exists(&path);
        let result = match (change.change_type, exists, change.content.as_deref()) {
            (ChangeType::Create, true, _) => skipped(change, "file already exists"),
            (ChangeType::Create, false, None) | (ChangeType::Update, true, None) => {
                skipped(change, "no content provided (diff-only changes are not applied)")
            }
            (ChangeType::Update | ChangeType::Delete, false, _) => {
                skipped(change, "file does not exist")
            }
            (ChangeType::Create, false, Some(content)) => {
                storage.write(&path, content)?;
                applied(change, None)
            }
            (ChangeType::Update, true, Some(content)) => {
                let backup = backup(snapshot_dir, projects_dir, &path)?;
                storage.write(&path, content)?;
                applied(change, backup)
            }
            (ChangeType::Delete, true, _) => {
                let backup = backup(snapshot_dir, projects_dir, &path)?;
                storage.remove(&path)?;
                applied(change, backup)
            }
        };
        if result.is_applied() {
            tracing::info!(
                file = %change.file_path,
                change = change.change_type.as_str(),
                "applied proposed change"
            );
        }
        results.push(result);
    }
    Ok(results)
}

fn applied(change: &ProposedChange, backup: Option<String>) -> AppliedChange {
    AppliedChange {
        file_path: change.file_path.clone(),
        change_type: change.change_type,
        outcome: ChangeOutcome::Applied { backup },
    }
}

fn backup(snapshot_dir: Option<&Path>, base: &Path, path: &Path) -> Result<Option<String>> {
    let Some(dir) = snapshot_dir else {
        return Ok(None);
    };
    Ok(snapshot_file(dir, base, path)?.map(|p| p.display().to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
