use std::path::{Path, PathBuf};
use zoom_core::paths::ZOOM_DIR;

/// Resolve the zoom root directory.
///
/// Priority:
/// 1. `--root` flag / `ZOOM_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.zoom/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_from(explicit, &cwd)
}

fn resolve_from(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    cwd.ancestors()
        .find(|dir| dir.join(ZOOM_DIR).is_dir())
        .unwrap_or(cwd)
        .to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_from(Some(dir.path()), Path::new("/elsewhere"));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_zoom_dir_in_ancestor() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".zoom")).unwrap();
        let subdir = dir.path().join("projects/deep");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(resolve_from(None, &subdir), dir.path());
    }

    #[test]
    fn falls_back_to_cwd() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_from(None, dir.path()), dir.path());
    }
}
