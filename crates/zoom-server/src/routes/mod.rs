pub mod analyze;
pub mod changes;
pub mod config;
pub mod events;
pub mod levels;
pub mod projects;
pub mod tasks;

use std::path::{Path, PathBuf};
use zoom_core::config::Config;

/// The configured projects directory for `root`.
pub(crate) fn projects_dir(root: &Path) -> zoom_core::Result<PathBuf> {
    Ok(Config::load(root)?.projects_path(root))
}
