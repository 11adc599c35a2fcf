use crate::error::{Result, ZoomError};
use crate::types::Level;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Checkbox lines
// ---------------------------------------------------------------------------

static CHECKBOX_RE: OnceLock<Regex> = OnceLock::new();

fn checkbox_re() -> &'static Regex {
    CHECKBOX_RE.get_or_init(|| Regex::new(r"^\s*- \[([ xX])\]\s+(.+)$").unwrap())
}

/// The two facts a checkbox line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkbox<'a> {
    pub completed: bool,
    pub description: &'a str,
}

/// Parse `- [ ] text` / `- [x] text` (any leading whitespace, `x` in either case).
///
/// Returns `None` for anything else, including a checkbox with blank text.
pub fn parse_checkbox(line: &str) -> Option<Checkbox<'_>> {
    let caps = checkbox_re().captures(line.trim_end_matches(['\r', '\n']))?;
    let description = caps.get(2)?.as_str().trim();
    if description.is_empty() {
        return None;
    }
    Some(Checkbox {
        completed: &caps[1] != " ",
        description,
    })
}

/// Render a task as a markdown checkbox line (no indentation, no newline).
pub fn format_task_line(completed: bool, description: &str) -> String {
    let mark = if completed { 'x' } else { ' ' };
    format!("- [{mark}] {}", description.trim())
}

/// A description can be written back as exactly one checkbox line.
pub fn validate_description(description: &str) -> Result<()> {
    let trimmed = description.trim();
    if trimmed.is_empty() || trimmed.contains(['\n', '\r']) {
        return Err(ZoomError::InvalidTaskLine(description.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// TaskRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub description: String,
    pub completed: bool,
    /// `None` when the line sits outside every `Level N` section.
    pub level: Option<Level>,
    /// Path relative to the projects directory, `/`-separated.
    pub source_file: String,
    /// Only valid until the file is next written.
    pub source_line_index: usize,
    pub project_name: String,
}

impl TaskRecord {
    /// Strict constructor: the line must be a checkbox with non-empty text.
    pub fn from_line(
        line: &str,
        level: Option<Level>,
        source_file: impl Into<String>,
        source_line_index: usize,
        project_name: impl Into<String>,
    ) -> Result<Self> {
        let checkbox =
            parse_checkbox(line).ok_or_else(|| ZoomError::InvalidTaskLine(line.to_string()))?;
        Ok(Self {
            description: checkbox.description.to_string(),
            completed: checkbox.completed,
            level,
            source_file: source_file.into(),
            source_line_index,
            project_name: project_name.into(),
        })
    }

    pub fn to_line(&self) -> String {
        format_task_line(self.completed, &self.description)
    }
}

/// "1/2 completed (50%)"
pub fn summarize(tasks: &[TaskRecord]) -> String {
    let total = tasks.len();
    let done = tasks.iter().filter(|t| t.completed).count();
    format!(
        "{done}/{total} completed ({}%)",
        completion_rate(done, total)
    )
}

/// Integer percent, rounded; `0` for an empty list.
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
