//! Request and response shapes for LLM analysis of the task tree.
//!
//! Building the prompt and interpreting the reply are pure functions here; the
//! transport lives in `claude-agent`.

use crate::aggregate::{aggregate, Aggregate};
use crate::error::{Result, ZoomError};
use crate::storage::Storage;
use crate::types::Level;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Create,
    Update,
    Delete,
}

impl ChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::Create => "create",
            ChangeType::Update => "update",
            ChangeType::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedChange {
    /// Relative to the projects directory.
    pub file_path: String,
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub analysis: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub proposed_changes: Vec<ProposedChange>,
    #[serde(default)]
    pub reasoning: String,
}

impl Analysis {
    /// What the caller gets when the model's reply has no usable JSON.
    pub fn from_raw_text(text: &str) -> Self {
        Self {
            analysis: text.trim().to_string(),
            suggestions: Vec::new(),
            proposed_changes: Vec::new(),
            reasoning: "The response was not structured JSON; showing it verbatim.".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

pub const SYSTEM_PROMPT: &str = r#"You are a planning assistant for a personal task system.
Tasks live in markdown files, one project per file. Each file has sections
`## Level N ...` for five zoom levels:
  0 = actions for the next 15 minutes, 1 = today, 2 = this week,
  3 = this quarter, 4 = life goals.
Tasks are checkbox lines: `- [ ] open task` or `- [x] done task`.

Reply with ONLY a raw JSON object, no code fences and no prose around it:
{
  "analysis": "what you observe about the user's tasks",
  "suggestions": ["short actionable suggestion"],
  "proposed_changes": [
    {
      "file_path": "relative/path.md",
      "change_type": "create|update|delete",
      "content": "full new file content for create/update",
      "diff": "optional unified diff for review"
    }
  ],
  "reasoning": "why you suggest this"
}
Only propose changes when the user asks for edits. Keep the Level heading
structure intact in any file content you write."#;

/// Render the task tree as compact markdown for the model.
///
/// `documents` are `(relative path, full text)` pairs included verbatim after
/// the summary, for files the model may need to rewrite.
pub fn render_context(agg: &Aggregate, documents: &[(String, String)]) -> String {
    let mut out = String::new();
    let totals = agg.totals();
    let _ = writeln!(
        out,
        "# Overview\n{} projects, {}/{} tasks completed ({}%)\n",
        agg.projects.len(),
        totals.completed_tasks,
        totals.total_tasks,
        totals.completion_rate
    );

    for project in &agg.projects {
        let _ = writeln!(
            out,
            "## {} ({}): {}/{} done, {}%",
            project.name,
            project.source_files.join(", "),
            project.completed_tasks,
            project.total_tasks,
            project.completion_rate
        );
        for level in Level::all() {
            let tasks = project.tasks_at(*level);
            if tasks.is_empty() {
                continue;
            }
            let _ = writeln!(out, "### Level {} ({})", level.index(), level.label());
            for task in tasks {
                let _ = writeln!(out, "{}", task.to_line());
            }
        }
        out.push('\n');
    }

    for (path, text) in documents {
        let _ = writeln!(out, "# File: {path}\n```markdown\n{}\n```\n", text.trim_end());
    }
    out
}

/// Aggregate `projects_dir` and render it as model context.
///
/// With `project`, only that project is summarized and its files are attached
/// verbatim so the model can propose full rewrites.
pub fn gather_context(
    storage: &impl Storage,
    projects_dir: &Path,
    project: Option<&str>,
) -> Result<String> {
    let agg = aggregate(storage, projects_dir)?;
    let Some(name) = project else {
        return Ok(render_context(&agg, &[]));
    };
    let summary = agg
        .project(name)
        .cloned()
        .ok_or_else(|| ZoomError::ProjectNotFound(name.to_string()))?;

    let mut documents = Vec::with_capacity(summary.source_files.len());
    for file in &summary.source_files {
        documents.push((file.clone(), storage.read(&projects_dir.join(file))?));
    }
    let scoped = Aggregate {
        projects: vec![summary],
        warnings: Vec::new(),
    };
    Ok(render_context(&scoped, &documents))
}

pub fn build_prompt(request: &str, context: &str) -> String {
    format!("Current task data:\n\n{context}\n---\n\nRequest: {}", request.trim())
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

static TRAILING_COMMA_RE: OnceLock<Regex> = OnceLock::new();

fn trailing_comma_re() -> &'static Regex {
    TRAILING_COMMA_RE.get_or_init(|| Regex::new(r",(\s*[}\]])").unwrap())
}

/// Pull the outermost `{ ... }` from an arbitrary string and parse it.
///
/// Tolerates code fences around the object and trailing commas inside it.
fn extract_json(text: &str) -> Option<serde_json::Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    let candidate = &text[start..=end];
    serde_json::from_str(candidate).ok().or_else(|| {
        let repaired = trailing_comma_re().replace_all(candidate, "$1");
        serde_json::from_str(&repaired).ok()
    })
}

fn parse_change(value: &serde_json::Value) -> Option<ProposedChange> {
    let file_path = value["file_path"].as_str()?.trim();
    if file_path.is_empty() {
        return None;
    }
    let change_type = serde_json::from_value(value["change_type"].clone()).ok()?;
    Some(ProposedChange {
        file_path: file_path.to_string(),
        change_type,
        content: value["content"].as_str().map(str::to_string),
        diff: value["diff"].as_str().map(str::to_string),
    })
}

/// Interpret a model reply. Never fails: malformed entries are dropped and a
/// reply without JSON becomes [`Analysis::from_raw_text`].
pub fn parse_response(text: &str) -> Analysis {
    let Some(json) = extract_json(text) else {
        return Analysis::from_raw_text(text);
    };

    let strings = |key: &str| -> Vec<String> {
        json[key]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    };

    Analysis {
        analysis: json["analysis"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| text.trim().to_string()),
        suggestions: strings("suggestions"),
        proposed_changes: json["proposed_changes"]
            .as_array()
            .map(|arr| arr.iter().filter_map(parse_change).collect())
            .unwrap_or_default(),
        reasoning: json["reasoning"].as_str().unwrap_or_default().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
