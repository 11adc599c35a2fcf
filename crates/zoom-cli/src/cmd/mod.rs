pub mod analyze;
pub mod config;
pub mod init;
pub mod project;
pub mod task;
pub mod ui;
pub mod view;

use anyhow::Context;
use std::path::{Path, PathBuf};
use zoom_core::aggregate::{aggregate, Aggregate};
use zoom_core::config::Config;
use zoom_core::FsStorage;

/// Load the config and resolve the projects directory.
pub(crate) fn load(root: &Path) -> anyhow::Result<(Config, PathBuf)> {
    let config = Config::load(root).context("failed to load config")?;
    let projects = config.projects_path(root);
    Ok((config, projects))
}

/// Aggregate every project under the root's projects directory.
pub(crate) fn load_aggregate(root: &Path) -> anyhow::Result<(PathBuf, Aggregate)> {
    let (_, projects) = load(root)?;
    let agg = aggregate(&FsStorage, &projects)
        .with_context(|| format!("failed to scan {}", projects.display()))?;
    Ok((projects, agg))
}
