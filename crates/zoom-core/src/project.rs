use crate::error::{Result, ZoomError};
use crate::paths;
use crate::storage::Storage;
use crate::types::Level;
use std::path::{Path, PathBuf};

const TITLE_PREFIX: &str = "# Project:";

/// `# Project: <name>` on the first line wins; otherwise the file stem. A
/// leading byte-order mark is ignored.
pub fn project_name(text: &str, path: &Path) -> String {
    let from_title = text
        .lines()
        .next()
        .and_then(|first| {
            first
                .trim_start_matches('\u{feff}')
                .trim()
                .strip_prefix(TITLE_PREFIX)
        })
        .map(str::trim)
        .filter(|name| !name.is_empty());
    match from_title {
        Some(name) => name.to_string(),
        None => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

/// Skeleton for a new project file: title plus one heading per zoom level.
pub fn template(name: &str) -> String {
    let mut out = format!("{TITLE_PREFIX} {}\n", name.trim());
    for level in Level::all() {
        out.push_str(&format!("\n## {}\n", level.heading()));
    }
    out
}

/// Create `<projects_dir>/<slug>.md` from [`template`].
pub fn create(storage: &impl Storage, projects_dir: &Path, name: &str) -> Result<PathBuf> {
    let slug = paths::slugify(name)?;
    let path = paths::project_file(projects_dir, &slug);
    if storage.exists(&path) {
        return Err(ZoomError::ProjectExists(name.to_string()));
    }
    storage.write(&path, &template(name))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{classify_line, LineKind};
    use crate::storage::FsStorage;
    use tempfile::TempDir;

    #[test]
    fn name_from_title_line() {
        assert_eq!(
            project_name("# Project: Demo\n## Level 0\n", Path::new("x/proj.md")),
            "Demo"
        );
    }

    #[test]
    fn name_falls_back_to_stem() {
        assert_eq!(project_name("# Demo\n", Path::new("x/proj.md")), "proj");
        assert_eq!(project_name("", Path::new("health.md")), "health");
        assert_eq!(project_name("# Project:   \n", Path::new("blank.md")), "blank");
    }

    #[test]
    fn title_after_byte_order_mark() {
        assert_eq!(
            project_name("\u{feff}# Project: Demo\r\n- [ ] a\r\n", Path::new("file.md")),
            "Demo"
        );
    }

    #[test]
    fn title_must_be_first_line() {
        assert_eq!(
            project_name("\n# Project: Late\n", Path::new("early.md")),
            "early"
        );
    }

    #[test]
    fn template_has_every_level_heading() {
        let text = template("Fitness");
        assert_eq!(project_name(&text, Path::new("f.md")), "Fitness");
        let levels: Vec<Level> = text
            .lines()
            .filter_map(|l| match classify_line(l) {
                LineKind::LevelHeading(level) => Some(level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, Level::all().to_vec());
    }

    #[test]
    fn create_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = create(&FsStorage, dir.path(), "Fitness Plan").unwrap();
        assert_eq!(path, dir.path().join("fitness-plan.md"));
        let err = create(&FsStorage, dir.path(), "Fitness Plan").unwrap_err();
        assert!(matches!(err, ZoomError::ProjectExists(_)));
    }
}
