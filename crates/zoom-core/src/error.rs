use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZoomError {
    #[error("not initialized: run 'zoom init'")]
    NotInitialized,

    #[error("invalid task line: {0:?}")]
    InvalidTaskLine(String),

    #[error("task not found in {file}: {description}")]
    TaskNotFound { file: String, description: String },

    #[error("Level {level} section not found in project {project}")]
    SectionNotFound { level: u8, project: String },

    #[error("invalid level '{0}': expected 0-4")]
    InvalidLevel(String),

    #[error("invalid project name '{0}': must produce a lowercase alphanumeric slug")]
    InvalidSlug(String),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("project already exists: {0}")]
    ProjectExists(String),

    #[error("invalid path '{0}': must be relative to the projects directory")]
    InvalidPath(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("file is not valid UTF-8 text: {}", .0.display())]
    InvalidEncoding(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ZoomError>;
