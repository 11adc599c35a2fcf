use crate::error::Result;
use crate::paths::relative_display;
use crate::project::project_name;
use crate::scan::scan;
use crate::storage::Storage;
use crate::task::{completion_rate, TaskRecord};
use crate::types::Level;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ProjectSummary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    /// Every file that contributed, in enumeration order. More than one entry
    /// means several files share the same project title.
    pub source_files: Vec<String>,
    /// All checkbox lines, classified or not.
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub completion_rate: u32,
    /// Classified tasks only; every level 0-4 is present.
    pub tasks_by_level: BTreeMap<Level, Vec<TaskRecord>>,
}

impl ProjectSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_files: Vec::new(),
            total_tasks: 0,
            completed_tasks: 0,
            completion_rate: 0,
            tasks_by_level: Level::all().iter().map(|l| (*l, Vec::new())).collect(),
        }
    }

    /// Summarize one file's text. `source_file` is the path recorded on each task.
    pub fn from_text(text: &str, path: &Path, source_file: &str) -> Self {
        let name = project_name(text, path);
        let mut summary = ProjectSummary::new(name.clone());
        summary.source_files.push(source_file.to_string());

        for task in scan(text) {
            summary.total_tasks += 1;
            if task.completed {
                summary.completed_tasks += 1;
            }
            let Some(level) = task.level else {
                continue;
            };
            summary
                .tasks_by_level
                .entry(level)
                .or_default()
                .push(TaskRecord {
                    description: task.description,
                    completed: task.completed,
                    level: Some(level),
                    source_file: source_file.to_string(),
                    source_line_index: task.line_index,
                    project_name: name.clone(),
                });
        }
        summary.completion_rate = completion_rate(summary.completed_tasks, summary.total_tasks);
        summary
    }

    /// Fold a same-named project in: counts add up, task lists append.
    pub fn merge(&mut self, other: ProjectSummary) {
        self.source_files.extend(other.source_files);
        self.total_tasks += other.total_tasks;
        self.completed_tasks += other.completed_tasks;
        for (level, tasks) in other.tasks_by_level {
            self.tasks_by_level.entry(level).or_default().extend(tasks);
        }
        self.completion_rate = completion_rate(self.completed_tasks, self.total_tasks);
    }

    pub fn tasks_at(&self, level: Level) -> &[TaskRecord] {
        self.tasks_by_level
            .get(&level)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn classified_tasks(&self) -> impl Iterator<Item = &TaskRecord> {
        self.tasks_by_level.values().flatten()
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AggregateWarning {
    pub source_file: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub completion_rate: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Aggregate {
    /// In file enumeration order, one entry per distinct project name.
    pub projects: Vec<ProjectSummary>,
    /// Files and directories that could not be read and were left out.
    pub warnings: Vec<AggregateWarning>,
}

impl Aggregate {
    pub fn project(&self, name: &str) -> Option<&ProjectSummary> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// One zoom level across every project, in project order then file order.
    pub fn tasks_at_level(&self, level: Level, open_only: bool) -> Vec<&TaskRecord> {
        self.projects
            .iter()
            .flat_map(|p| p.tasks_at(level))
            .filter(|t| !open_only || !t.completed)
            .collect()
    }

    pub fn totals(&self) -> Totals {
        let total_tasks = self.projects.iter().map(|p| p.total_tasks).sum();
        let completed_tasks = self.projects.iter().map(|p| p.completed_tasks).sum();
        Totals {
            total_tasks,
            completed_tasks,
            completion_rate: completion_rate(completed_tasks, total_tasks),
        }
    }

    fn insert(&mut self, summary: ProjectSummary) {
        match self.projects.iter_mut().find(|p| p.name == summary.name) {
            Some(existing) => existing.merge(summary),
            None => self.projects.push(summary),
        }
    }
}

/// Scan every markdown file under `dir` into per-project summaries.
///
/// Only listing `dir` itself can fail; unreadable files and directories are
/// skipped and reported in [`Aggregate::warnings`].
pub fn aggregate(storage: &impl Storage, dir: &Path) -> Result<Aggregate> {
    let mut out = Aggregate::default();
    let listing = storage.list_markdown_files(dir)?;
    for path in listing.files {
        let source_file = relative_display(dir, &path);
        let text = match storage.read(&path) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(file = %source_file, error = %e, "skipping unreadable project file");
                out.warnings.push(AggregateWarning {
                    source_file,
                    message: e.to_string(),
                });
                continue;
            }
        };
        out.insert(ProjectSummary::from_text(&text, &path, &source_file));
    }
    for (path, reason) in listing.skipped {
        let source_file = relative_display(dir, &path);
        tracing::warn!(path = %source_file, error = %reason, "skipping unreadable entry");
        out.warnings.push(AggregateWarning {
            source_file,
            message: reason,
        });
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
