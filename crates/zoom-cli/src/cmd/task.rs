use crate::output::print_json;
use anyhow::{bail, Context};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use zoom_core::aggregate::aggregate;
use zoom_core::mutate::{complete_task, insert_task, reopen_task};
use zoom_core::{paths, FsStorage, Level, ZoomError};

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// Mark an open task done
    Complete {
        /// Project name, or a file path relative to the projects directory
        project: String,
        /// Exact task text
        #[arg(required = true)]
        description: Vec<String>,
    },
    /// Mark a done task open again
    Reopen {
        project: String,
        #[arg(required = true)]
        description: Vec<String>,
    },
    /// Add a task to the end of a level section
    Add {
        project: String,
        /// 0-4, or a name: actions, today, week, quarter, life
        #[arg(long, short = 'l')]
        level: String,
        /// Add it already checked off
        #[arg(long)]
        done: bool,
        #[arg(required = true)]
        description: Vec<String>,
    },
}

pub fn run(root: &Path, subcmd: TaskSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TaskSubcommand::Complete {
            project,
            description,
        } => set_completed(root, &project, &description.join(" "), true, json),
        TaskSubcommand::Reopen {
            project,
            description,
        } => set_completed(root, &project, &description.join(" "), false, json),
        TaskSubcommand::Add {
            project,
            level,
            done,
            description,
        } => add(root, &project, &level, &description.join(" "), done, json),
    }
}

// ---------------------------------------------------------------------------
// Target resolution
// ---------------------------------------------------------------------------

/// Accept either a markdown path under the projects directory or a project
/// name. A name shared by several files is ambiguous and must be given as a
/// path instead.
fn resolve_target(projects: &Path, target: &str) -> anyhow::Result<PathBuf> {
    if target.to_ascii_lowercase().ends_with(".md") {
        return Ok(paths::resolve_in(projects, target)?);
    }
    let agg = aggregate(&FsStorage, projects)?;
    let project = agg
        .project(target)
        .ok_or_else(|| ZoomError::ProjectNotFound(target.to_string()))?;
    match project.source_files.as_slice() {
        [only] => Ok(projects.join(only)),
        files => bail!(
            "project '{target}' spans several files ({}); pass one of them instead",
            files.join(", ")
        ),
    }
}

// ---------------------------------------------------------------------------
// complete / reopen
// ---------------------------------------------------------------------------

fn set_completed(
    root: &Path,
    target: &str,
    description: &str,
    completed: bool,
    json: bool,
) -> anyhow::Result<()> {
    let (_, projects) = super::load(root)?;
    let path = resolve_target(&projects, target)?;
    let result = if completed {
        complete_task(&FsStorage, &path, description)
    } else {
        reopen_task(&FsStorage, &path, description)
    };
    let line = result.with_context(|| format!("failed to update task in {target}"))?;

    let file = paths::relative_display(&projects, &path);
    if json {
        print_json(&serde_json::json!({
            "file": file,
            "description": description.trim(),
            "line_index": line,
            "completed": completed,
        }))?;
    } else if completed {
        println!("Completed: {} ({file}:{})", description.trim(), line + 1);
    } else {
        println!("Reopened: {} ({file}:{})", description.trim(), line + 1);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// add
// ---------------------------------------------------------------------------

fn add(
    root: &Path,
    target: &str,
    level: &str,
    description: &str,
    done: bool,
    json: bool,
) -> anyhow::Result<()> {
    let level: Level = level.parse()?;
    let (_, projects) = super::load(root)?;
    let path = resolve_target(&projects, target)?;
    let line = insert_task(&FsStorage, &path, level, description, done)
        .with_context(|| format!("failed to add task to {target}"))?;

    let file = paths::relative_display(&projects, &path);
    if json {
        print_json(&serde_json::json!({
            "file": file,
            "level": level,
            "description": description.trim(),
            "line_index": line,
        }))?;
    } else {
        println!(
            "Added to {}: {} ({file}:{})",
            level.heading(),
            description.trim(),
            line + 1
        );
    }
    Ok(())
}
