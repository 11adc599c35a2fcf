//! Level-section scanner.
//!
//! Walks a project file line by line, tracking which `Level N` section each
//! line belongs to, and emits every checkbox it sees together with that level.
//! The walk is an explicit two-state machine folded over the lines; nothing
//! outside the fold holds scan state.

use crate::error::{Result, ZoomError};
use crate::task::{parse_checkbox, Checkbox};
use crate::types::Level;
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;

static LEVEL_RE: OnceLock<Regex> = OnceLock::new();

fn level_re() -> &'static Regex {
    // A single digit 0-4 directly after "Level ", not the start of "Level 10".
    LEVEL_RE.get_or_init(|| Regex::new(r"Level ([0-4])(?:[^0-9]|$)").unwrap())
}

// ---------------------------------------------------------------------------
// Line classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `## Level 2 This Week`, any heading depth.
    LevelHeading(Level),
    /// `## Notes`: a `##`-or-deeper heading that never mentions `Level`.
    SectionBreak,
    /// Any other heading (`# Project: X`, `## Level 9`): leaves state alone.
    Heading,
    Task(Checkbox<'a>),
    Text,
}

pub fn is_heading(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        if let Some(caps) = level_re().captures(trimmed) {
            let level = caps[1]
                .parse::<u8>()
                .ok()
                .and_then(Level::from_index);
            if let Some(level) = level {
                return LineKind::LevelHeading(level);
            }
        }
        if trimmed.starts_with("##") && !trimmed.contains("Level") {
            return LineKind::SectionBreak;
        }
        return LineKind::Heading;
    }
    match parse_checkbox(line) {
        Some(cb) => LineKind::Task(cb),
        None => LineKind::Text,
    }
}

// ---------------------------------------------------------------------------
// ScanState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    NoSection,
    InLevel(Level),
}

impl ScanState {
    pub fn level(self) -> Option<Level> {
        match self {
            ScanState::NoSection => None,
            ScanState::InLevel(level) => Some(level),
        }
    }

    /// State after consuming a line of the given kind.
    pub fn step(self, kind: &LineKind<'_>) -> ScanState {
        match kind {
            LineKind::LevelHeading(level) => ScanState::InLevel(*level),
            LineKind::SectionBreak => ScanState::NoSection,
            LineKind::Heading | LineKind::Task(_) | LineKind::Text => self,
        }
    }
}

// ---------------------------------------------------------------------------
// scan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannedTask {
    pub level: Option<Level>,
    pub completed: bool,
    pub description: String,
    pub line_index: usize,
}

/// Every checkbox in `text`, in file order, tagged with its section's level.
///
/// Checkboxes outside any level section are kept with `level: None`; callers
/// that only want classified tasks filter them out.
pub fn scan(text: &str) -> Vec<ScannedTask> {
    let (_, tasks) = text.lines().enumerate().fold(
        (ScanState::NoSection, Vec::new()),
        |(state, mut tasks), (line_index, line)| {
            let kind = classify_line(line);
            if let LineKind::Task(cb) = kind {
                tasks.push(ScannedTask {
                    level: state.level(),
                    completed: cb.completed,
                    description: cb.description.to_string(),
                    line_index,
                });
            }
            (state.step(&kind), tasks)
        },
    );
    tasks
}

/// Like [`scan`], for raw file contents that may not be text.
pub fn scan_bytes(bytes: &[u8], path: &Path) -> Result<Vec<ScannedTask>> {
    let text =
        std::str::from_utf8(bytes).map_err(|_| ZoomError::InvalidEncoding(path.to_path_buf()))?;
    Ok(scan(text))
}

/// Where the section for `level` lives: the heading's line index and the
/// index of the next heading of any kind (or the line count at EOF).
///
/// Only the first heading for `level` counts.
pub fn section_bounds(lines: &[&str], level: Level) -> Option<(usize, usize)> {
    let start = lines
        .iter()
        .position(|line| classify_line(line) == LineKind::LevelHeading(level))?;
    let end = lines[start + 1..]
        .iter()
        .position(|line| is_heading(line))
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len());
    Some((start, end))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn triples(text: &str) -> Vec<(Option<u8>, bool, String)> {
        scan(text)
            .into_iter()
            .map(|t| (t.level.map(Level::index), t.completed, t.description))
            .collect()
    }

    #[test]
    fn non_level_section_resets_level() {
        let out = triples("## Level 0\n- [ ] a\n## Notes\n- [ ] b\n");
        assert_eq!(
            out,
            vec![(Some(0), false, "a".to_string()), (None, false, "b".to_string())]
        );
    }

    #[test]
    fn tasks_before_any_heading_are_unclassified() {
        let out = triples("- [x] loose\n# Project: X\n## Level 1 Today\n- [ ] t\n");
        assert_eq!(out[0], (None, true, "loose".to_string()));
        assert_eq!(out[1], (Some(1), false, "t".to_string()));
    }

    #[test]
    fn project_title_does_not_reset_section() {
        let out = triples("## Level 2 This Week\n# Appendix\n- [ ] still week\n");
        assert_eq!(out, vec![(Some(2), false, "still week".to_string())]);
    }

    #[test]
    fn level_heading_at_any_depth() {
        let out = triples("# Level 3 Quarter\n- [ ] q\n#### Level 4 Life Goals\n- [ ] l\n");
        assert_eq!(
            out,
            vec![(Some(3), false, "q".to_string()), (Some(4), false, "l".to_string())]
        );
    }

    #[test]
    fn out_of_range_levels_are_not_sections() {
        assert_eq!(classify_line("## Level 5 Beyond"), LineKind::Heading);
        assert_eq!(classify_line("## Level 10 Goals"), LineKind::Heading);
        assert_eq!(classify_line("## level 1 lowercase"), LineKind::SectionBreak);
    }

    #[test]
    fn heading_mentioning_level_keeps_state() {
        let out = triples("## Level 1 Today\n## Level Up Ideas\n- [ ] x\n");
        assert_eq!(out, vec![(Some(1), false, "x".to_string())]);
    }

    #[test]
    fn line_indices_are_zero_based_file_positions() {
        let tasks = scan("# Project: Demo\n## Level 0 Actions\n- [ ] Write tests\n\n  - [x] Draft\n");
        assert_eq!(tasks[0].line_index, 2);
        assert_eq!(tasks[1].line_index, 4);
        assert_eq!(tasks[1].level, Some(Level::Actions));
    }

    #[test]
    fn no_level_headings_yields_all_unclassified() {
        let tasks = scan("- [ ] a\n- [x] b\n");
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.level.is_none()));
    }

    #[test]
    fn scan_bytes_rejects_non_utf8() {
        let err = scan_bytes(&[0xff, 0xfe, 0x00], Path::new("bad.md")).unwrap_err();
        assert!(matches!(err, ZoomError::InvalidEncoding(_)));
    }

    #[test]
    fn section_bounds_stops_at_next_heading() {
        let lines: Vec<&str> = "## Level 0\n- [ ] a\n\n## Level 1\n- [ ] b\n"
            .lines()
            .collect();
        assert_eq!(section_bounds(&lines, Level::Actions), Some((0, 3)));
        assert_eq!(section_bounds(&lines, Level::Today), Some((3, 5)));
        assert_eq!(section_bounds(&lines, Level::Week), None);
    }

    #[test]
    fn state_machine_steps() {
        let s = ScanState::default();
        assert_eq!(s.level(), None);
        let s = s.step(&LineKind::LevelHeading(Level::Week));
        assert_eq!(s.level(), Some(Level::Week));
        let s = s.step(&LineKind::Text);
        assert_eq!(s, ScanState::InLevel(Level::Week));
        assert_eq!(s.step(&LineKind::SectionBreak), ScanState::NoSection);
    }
}
