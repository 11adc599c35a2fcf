use crate::error::{Result, ZoomError};
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const ZOOM_DIR: &str = ".zoom";
pub const BACKUPS_DIR: &str = ".zoom/backups";
pub const CONFIG_FILE: &str = ".zoom/config.yaml";
pub const DEFAULT_PROJECTS_DIR: &str = "projects";

pub const MARKDOWN_EXT: &str = "md";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn zoom_dir(root: &Path) -> PathBuf {
    root.join(ZOOM_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn backups_dir(root: &Path) -> PathBuf {
    root.join(BACKUPS_DIR)
}

pub fn project_file(projects_dir: &Path, slug: &str) -> PathBuf {
    projects_dir.join(format!("{slug}.{MARKDOWN_EXT}"))
}

/// Resolve a client-supplied path against the projects directory.
///
/// Only plain relative paths are accepted: absolute paths, `..`, and prefix
/// components are rejected so callers cannot reach outside `projects_dir`.
pub fn resolve_in(projects_dir: &Path, relative: &str) -> Result<PathBuf> {
    let rel = Path::new(relative);
    if relative.trim().is_empty() {
        return Err(ZoomError::InvalidPath(relative.to_string()));
    }
    for component in rel.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => return Err(ZoomError::InvalidPath(relative.to_string())),
        }
    }
    Ok(projects_dir.join(rel))
}

/// Render `path` relative to `base` with `/` separators.
///
/// Falls back to the full path when `path` is not under `base`.
pub fn relative_display(base: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(ZoomError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

/// Turn a free-form project name into a file slug: "Ship v2 Launch!" → "ship-v2-launch".
pub fn slugify(name: &str) -> Result<String> {
    let slug = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    validate_slug(&slug).map_err(|_| ZoomError::InvalidSlug(name.to_string()))?;
    Ok(slug)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
