use crate::error::{Result, ZoomError};
use crate::paths::MARKDOWN_EXT;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// File access used by the aggregator and mutator.
///
/// Paths are passed through unchanged; implementations decide how to resolve
/// them.
pub trait Storage {
    fn exists(&self, path: &Path) -> bool;

    /// Fails with `FileNotFound` when the path is missing and
    /// `InvalidEncoding` when the contents are not UTF-8.
    fn read(&self, path: &Path) -> Result<String>;

    fn write(&self, path: &Path, text: &str) -> Result<()>;

    fn remove(&self, path: &Path) -> Result<()>;

    /// Every markdown file below `root`, recursively. Only a failure to read
    /// `root` itself is an error; anything deeper lands in
    /// [`Listing::skipped`].
    fn list_markdown_files(&self, root: &Path) -> Result<Listing>;
}

/// Markdown files found below a root, plus the entries that could not be
/// visited.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub files: Vec<PathBuf>,
    /// `(path, reason)` for unreadable directories and broken links.
    pub skipped: Vec<(PathBuf, String)>,
}

impl From<Vec<PathBuf>> for Listing {
    fn from(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            skipped: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// FsStorage
// ---------------------------------------------------------------------------

/// The local filesystem. Writes are atomic (tempfile + rename).
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl Storage for FsStorage {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> Result<String> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ZoomError::FileNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };
        String::from_utf8(bytes).map_err(|_| ZoomError::InvalidEncoding(path.to_path_buf()))
    }

    fn write(&self, path: &Path, text: &str) -> Result<()> {
        crate::io::atomic_write(path, text.as_bytes())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ZoomError::FileNotFound(path.to_path_buf()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Sorted by file name within each directory; hidden files and
    /// directories (`.zoom/`, editor swap files) are skipped. Symlinked files
    /// are listed when they resolve to a regular file.
    fn list_markdown_files(&self, root: &Path) -> Result<Listing> {
        if !root.is_dir() {
            return Err(ZoomError::FileNotFound(root.to_path_buf()));
        }
        let mut listing = Listing::default();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    listing.skipped.push((path, e.to_string()));
                    continue;
                }
            };
            if !is_markdown(entry.path()) {
                continue;
            }
            if entry.file_type().is_file() {
                listing.files.push(entry.into_path());
            } else if entry.path_is_symlink() {
                match std::fs::metadata(entry.path()) {
                    Ok(meta) if meta.is_file() => listing.files.push(entry.into_path()),
                    Ok(_) => {}
                    Err(e) => listing
                        .skipped
                        .push((entry.into_path(), format!("broken link: {e}"))),
                }
            }
        }
        Ok(listing)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(MARKDOWN_EXT))
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
