//! Task mutation by exact line match.
//!
//! Every operation re-reads the file immediately before changing it and only
//! trusts `(path, description)` from the caller; line indices from an earlier
//! scan are never reused. There is no locking: two writers on the same file
//! can still lose an update.

use crate::error::{Result, ZoomError};
use crate::project::project_name;
use crate::scan::section_bounds;
use crate::storage::Storage;
use crate::task::{format_task_line, parse_checkbox, validate_description};
use crate::types::Level;
use std::path::Path;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A file split into lines, each keeping its own terminator so untouched
/// lines are written back byte for byte.
struct Document {
    lines: Vec<String>,
    /// `"\n"`, `"\r\n"`, or `""` for a final line without a newline.
    endings: Vec<&'static str>,
    /// Terminator for inserted lines: the first one found in the file.
    eol: &'static str,
}

impl Document {
    fn parse(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut endings = Vec::new();
        for raw in text.split_inclusive('\n') {
            let (line, ending) = if let Some(line) = raw.strip_suffix("\r\n") {
                (line, "\r\n")
            } else if let Some(line) = raw.strip_suffix('\n') {
                (line, "\n")
            } else {
                (raw, "")
            };
            lines.push(line.to_string());
            endings.push(ending);
        }
        let eol = endings
            .iter()
            .copied()
            .find(|e| !e.is_empty())
            .unwrap_or("\n");
        Self {
            lines,
            endings,
            eol,
        }
    }

    /// Insert a line before `at`. Appending after an unterminated last line
    /// moves the missing newline onto the new line.
    fn insert(&mut self, at: usize, line: String) {
        let ending = if at == self.lines.len() && self.endings.last() == Some(&"") {
            if let Some(last) = self.endings.last_mut() {
                *last = self.eol;
            }
            ""
        } else {
            self.eol
        };
        self.lines.insert(at, line);
        self.endings.insert(at, ending);
    }

    fn render(&self) -> String {
        self.lines
            .iter()
            .zip(&self.endings)
            .map(|(line, ending)| format!("{line}{ending}"))
            .collect()
    }
}

/// Rewrite the `[ ]`/`[x]` marker of a checkbox line, keeping everything else.
fn set_marker(line: &str, completed: bool) -> String {
    let Some(at) = line.find("- [") else {
        return line.to_string();
    };
    let mark = if completed { 'x' } else { ' ' };
    let marker_end = at + "- [ ]".len();
    format!("{}- [{mark}]{}", &line[..at], &line[marker_end..])
}

// ---------------------------------------------------------------------------
// complete / reopen
// ---------------------------------------------------------------------------

/// Mark the first open task whose description is exactly `description` as done.
///
/// Returns the rewritten line's index. `TaskNotFound` means the caller's view
/// is stale (already done, renamed, or deleted) and should be refreshed.
pub fn complete_task(storage: &impl Storage, path: &Path, description: &str) -> Result<usize> {
    set_completed(storage, path, description, true)
}

/// Inverse of [`complete_task`]: `[x]` back to `[ ]`.
pub fn reopen_task(storage: &impl Storage, path: &Path, description: &str) -> Result<usize> {
    set_completed(storage, path, description, false)
}

fn set_completed(
    storage: &impl Storage,
    path: &Path,
    description: &str,
    completed: bool,
) -> Result<usize> {
    let wanted = description.trim();
    let text = storage.read(path)?;
    let mut doc = Document::parse(&text);

    let index = doc
        .lines
        .iter()
        .position(|line| {
            parse_checkbox(line)
                .is_some_and(|cb| cb.completed != completed && cb.description == wanted)
        })
        .ok_or_else(|| ZoomError::TaskNotFound {
            file: path.display().to_string(),
            description: wanted.to_string(),
        })?;

    doc.lines[index] = set_marker(&doc.lines[index], completed);
    storage.write(path, &doc.render())?;
    tracing::debug!(file = %path.display(), line = index, completed, "task updated");
    Ok(index)
}

// ---------------------------------------------------------------------------
// insert
// ---------------------------------------------------------------------------

/// Append a task to the end of the `level` section of `path`.
///
/// The line goes after the section's last non-blank line, so spacing before
/// the next heading survives. Returns the new line's index.
///
/// Never creates a section: a file without a heading for `level` yields
/// `SectionNotFound` and is left untouched.
pub fn insert_task(
    storage: &impl Storage,
    path: &Path,
    level: Level,
    description: &str,
    completed: bool,
) -> Result<usize> {
    validate_description(description)?;
    let text = storage.read(path)?;
    let mut doc = Document::parse(&text);

    let bounds = {
        let lines: Vec<&str> = doc.lines.iter().map(String::as_str).collect();
        section_bounds(&lines, level)
    };
    let Some((heading, end)) = bounds else {
        return Err(ZoomError::SectionNotFound {
            level: level.index(),
            project: project_name(&text, path),
        });
    };

    let insert_at = (heading + 1..end)
        .rev()
        .find(|&i| !doc.lines[i].trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(heading + 1);

    doc.insert(insert_at, format_task_line(completed, description));
    storage.write(path, &doc.render())?;
    tracing::debug!(file = %path.display(), line = insert_at, level = %level, "task inserted");
    Ok(insert_at)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::scan::scan;
    use crate::storage::FsStorage;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn project(dir: &TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("proj.md");
        std::fs::write(&path, text).unwrap();
        path
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    const DEMO: &str = "# Project: Demo\n## Level 0 Actions (Next 15 minutes)\n- [ ] Write tests\n- [x] Draft design\n";

    #[test]
    fn complete_rewrites_only_the_marker() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir, DEMO);
        let idx = complete_task(&FsStorage, &path, "Write tests").unwrap();
        assert_eq!(idx, 2);
        assert_eq!(
            read(&path),
            "# Project: Demo\n## Level 0 Actions (Next 15 minutes)\n- [x] Write tests\n- [x] Draft design\n"
        );
    }

    #[test]
    fn demo_scenario_updates_aggregate() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir, DEMO);
        let before = aggregate(&FsStorage, dir.path()).unwrap();
        assert_eq!(before.project("Demo").unwrap().completion_rate, 50);

        complete_task(&FsStorage, &path, "Write tests").unwrap();
        let after = aggregate(&FsStorage, dir.path()).unwrap();
        let demo = after.project("Demo").unwrap();
        assert_eq!(demo.completed_tasks, 2);
        assert_eq!(demo.completion_rate, 100);
    }

    #[test]
    fn exact_match_ignores_longer_descriptions() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir, "## Level 0\n- [ ] ab\n- [ ] a\n");
        complete_task(&FsStorage, &path, "a").unwrap();
        assert_eq!(read(&path), "## Level 0\n- [ ] ab\n- [x] a\n");
    }

    #[test]
    fn first_duplicate_wins() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir, "- [ ] same\n- [ ] same\n");
        assert_eq!(complete_task(&FsStorage, &path, "same").unwrap(), 0);
        assert_eq!(complete_task(&FsStorage, &path, "same").unwrap(), 1);
    }

    #[test]
    fn completing_a_done_task_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir, DEMO);
        let err = complete_task(&FsStorage, &path, "Draft design").unwrap_err();
        assert!(matches!(err, ZoomError::TaskNotFound { .. }));
        assert_eq!(read(&path), DEMO);
    }

    #[test]
    fn complete_preserves_indentation_and_crlf() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir, "## Level 1\r\n  - [ ] indented\r\n");
        complete_task(&FsStorage, &path, "  indented ").unwrap();
        assert_eq!(read(&path), "## Level 1\r\n  - [x] indented\r\n");
    }

    #[test]
    fn complete_leaves_other_line_endings_alone() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir, "## Level 0\n- [ ] a\r\n- [ ] b\n");
        complete_task(&FsStorage, &path, "b").unwrap();
        assert_eq!(read(&path), "## Level 0\n- [ ] a\r\n- [x] b\n");
    }

    #[test]
    fn insert_uses_first_line_ending_in_mixed_file() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir, "## Level 0\r\n- [ ] a\n\n## Level 1\n");
        insert_task(&FsStorage, &path, Level::Actions, "b", false).unwrap();
        assert_eq!(read(&path), "## Level 0\r\n- [ ] a\n- [ ] b\r\n\n## Level 1\n");
    }

    #[test]
    fn reopen_inverts_complete() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir, DEMO);
        reopen_task(&FsStorage, &path, "Draft design").unwrap();
        assert!(read(&path).contains("- [ ] Draft design"));
        assert!(matches!(
            reopen_task(&FsStorage, &path, "Draft design").unwrap_err(),
            ZoomError::TaskNotFound { .. }
        ));
    }

    #[test]
    fn missing_file_propagates() {
        let dir = TempDir::new().unwrap();
        let err = complete_task(&FsStorage, &dir.path().join("gone.md"), "x").unwrap_err();
        assert!(matches!(err, ZoomError::FileNotFound(_)));
    }

    #[test]
    fn insert_appends_before_blank_line_and_next_heading() {
        let dir = TempDir::new().unwrap();
        let path = project(
            &dir,
            "# Project: P\n\n## Level 0 Actions\n- [ ] first\n\n## Level 1 Today\n- [ ] later\n",
        );
        let idx = insert_task(&FsStorage, &path, Level::Actions, "second", false).unwrap();
        assert_eq!(idx, 4);
        assert_eq!(
            read(&path),
            "# Project: P\n\n## Level 0 Actions\n- [ ] first\n- [ ] second\n\n## Level 1 Today\n- [ ] later\n"
        );
    }

    #[test]
    fn insert_into_empty_section_goes_under_heading() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir, "## Level 2 This Week\n\n## Level 3 This Quarter\n");
        insert_task(&FsStorage, &path, Level::Week, "plan trip", true).unwrap();
        assert_eq!(
            read(&path),
            "## Level 2 This Week\n- [x] plan trip\n\n## Level 3 This Quarter\n"
        );
    }

    #[test]
    fn insert_into_last_section_appends_at_eof() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir, "## Level 4 Life Goals\n- [ ] learn piano");
        let idx = insert_task(&FsStorage, &path, Level::LifeGoals, "run a marathon", false).unwrap();
        assert_eq!(idx, 2);
        assert_eq!(
            read(&path),
            "## Level 4 Life Goals\n- [ ] learn piano\n- [ ] run a marathon"
        );
    }

    #[test]
    fn insert_without_section_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let text = "# Project: Short\n## Level 0\n- [ ] a\n## Level 1\n## Level 2\n";
        let path = project(&dir, text);
        let err = insert_task(&FsStorage, &path, Level::Quarter, "x", false).unwrap_err();
        match err {
            ZoomError::SectionNotFound { level, project } => {
                assert_eq!(level, 3);
                assert_eq!(project, "Short");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(read(&path), text);
    }

    #[test]
    fn insert_rejects_blank_description() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir, DEMO);
        assert!(matches!(
            insert_task(&FsStorage, &path, Level::Actions, "  ", false).unwrap_err(),
            ZoomError::InvalidTaskLine(_)
        ));
        assert_eq!(read(&path), DEMO);
    }

    #[test]
    fn insert_then_complete_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = project(&dir, "## Level 1 Today\n- [ ] existing\n## Notes\n- [ ] aside\n");
        insert_task(&FsStorage, &path, Level::Today, "Call dentist", false).unwrap();
        complete_task(&FsStorage, &path, "Call dentist").unwrap();

        let found = scan(&read(&path))
            .into_iter()
            .find(|t| t.description == "Call dentist")
            .unwrap();
        assert!(found.completed);
        assert_eq!(found.level, Some(Level::Today));
    }

    #[test]
    fn set_marker_keeps_surroundings() {
        assert_eq!(set_marker("   - [ ] a [ ] b", true), "   - [x] a [ ] b");
        assert_eq!(set_marker("- [X] done", false), "- [ ] done");
    }
}
