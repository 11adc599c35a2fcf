use crate::output::{marker, print_json, print_table, progress};
use std::path::Path;
use zoom_core::aggregate::ProjectSummary;
use zoom_core::{Level, ZoomError};

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

pub fn status(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, agg) = super::load_aggregate(root)?;
    let totals = agg.totals();

    if json {
        let projects: Vec<_> = agg
            .projects
            .iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "source_files": p.source_files,
                    "total_tasks": p.total_tasks,
                    "completed_tasks": p.completed_tasks,
                    "completion_rate": p.completion_rate,
                })
            })
            .collect();
        return print_json(&serde_json::json!({
            "projects": projects,
            "totals": totals,
            "warnings": agg.warnings,
        }));
    }

    if agg.projects.is_empty() {
        println!("No projects. Create one with: zoom project new \"<name>\"");
        return Ok(());
    }

    let rows = agg
        .projects
        .iter()
        .map(|p| {
            let open_now = p.tasks_at(Level::Actions).iter().filter(|t| !t.completed).count();
            vec![
                p.name.clone(),
                progress(p.completed_tasks, p.total_tasks, p.completion_rate),
                open_now.to_string(),
            ]
        })
        .collect();
    print_table(&["PROJECT", "DONE", "NEXT 15 MIN"], rows);
    println!(
        "\nTotal: {}",
        progress(totals.completed_tasks, totals.total_tasks, totals.completion_rate)
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// plan
// ---------------------------------------------------------------------------

pub fn plan(root: &Path, project: Option<&str>, json: bool) -> anyhow::Result<()> {
    let (_, agg) = super::load_aggregate(root)?;

    let selected: Vec<&ProjectSummary> = match project {
        Some(name) => vec![agg
            .project(name)
            .ok_or_else(|| ZoomError::ProjectNotFound(name.to_string()))?],
        None => agg.projects.iter().collect(),
    };

    if json {
        return print_json(&selected);
    }

    for (i, p) in selected.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "{}  {}",
            p.name,
            progress(p.completed_tasks, p.total_tasks, p.completion_rate)
        );
        for level in Level::all().iter().rev() {
            let tasks = p.tasks_at(*level);
            if tasks.is_empty() {
                continue;
            }
            println!("  {}", level.heading());
            for t in tasks {
                println!("    {} {}", marker(t.completed), t.description);
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// level
// ---------------------------------------------------------------------------

pub fn level(root: &Path, level: &str, open: bool, json: bool) -> anyhow::Result<()> {
    let level: Level = level.parse()?;
    let (_, agg) = super::load_aggregate(root)?;
    let tasks = agg.tasks_at_level(level, open);

    if json {
        return print_json(&serde_json::json!({
            "level": level,
            "heading": level.heading(),
            "tasks": tasks,
        }));
    }

    println!("{}", level.heading());
    if tasks.is_empty() {
        println!("  (nothing here)");
        return Ok(());
    }
    let rows = tasks
        .iter()
        .map(|t| {
            vec![
                marker(t.completed).to_string(),
                t.description.clone(),
                t.project_name.clone(),
                t.source_file.clone(),
            ]
        })
        .collect();
    print_table(&["", "TASK", "PROJECT", "FILE"], rows);
    Ok(())
}
