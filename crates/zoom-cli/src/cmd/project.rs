use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;
use zoom_core::{paths, project, FsStorage};

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// Create a project file with all five level sections
    New {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// List projects and the files they come from
    List,
}

pub fn run(root: &Path, subcmd: ProjectSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProjectSubcommand::New { name } => new(root, &name.join(" "), json),
        ProjectSubcommand::List => list(root, json),
    }
}

fn new(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let (_, projects) = super::load(root)?;
    let path = project::create(&FsStorage, &projects, name)
        .with_context(|| format!("failed to create project '{name}'"))?;
    let file = paths::relative_display(&projects, &path);

    if json {
        print_json(&serde_json::json!({ "name": name.trim(), "file": file }))?;
    } else {
        println!("Created project '{}' in {file}", name.trim());
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, agg) = super::load_aggregate(root)?;

    if json {
        let items: Vec<_> = agg
            .projects
            .iter()
            .map(|p| serde_json::json!({ "name": p.name, "source_files": p.source_files }))
            .collect();
        return print_json(&items);
    }

    if agg.projects.is_empty() {
        println!("No projects.");
        return Ok(());
    }
    let rows = agg
        .projects
        .iter()
        .map(|p| vec![p.name.clone(), p.source_files.join(", ")])
        .collect();
    print_table(&["NAME", "FILES"], rows);
    Ok(())
}
