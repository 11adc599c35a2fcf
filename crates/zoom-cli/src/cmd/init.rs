use anyhow::Context;
use std::path::Path;
use zoom_core::config::Config;
use zoom_core::{io, paths};

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing zoom in: {}", root.display());

    let zoom_dir = paths::zoom_dir(root);
    io::ensure_dir(&zoom_dir).with_context(|| format!("failed to create {}", zoom_dir.display()))?;

    let config_path = paths::config_path(root);
    let config = if config_path.exists() {
        println!("  exists:  .zoom/config.yaml");
        Config::load(root).context("failed to load config")?
    } else {
        let cfg = Config::default();
        cfg.save(root).context("failed to write config.yaml")?;
        println!("  created: .zoom/config.yaml");
        cfg
    };

    let projects = config.projects_path(root);
    if projects.is_dir() {
        println!("  exists:  {}/", config.projects_dir.display());
    } else {
        io::ensure_dir(&projects)
            .with_context(|| format!("failed to create {}", projects.display()))?;
        println!("  created: {}/", config.projects_dir.display());
    }

    println!("\nNext: zoom project new \"<name>\"");
    Ok(())
}
