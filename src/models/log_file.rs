//! Observed log files
//!
//! A `LogFile` pairs an identity with the place the log currently lives.

use std::path::{Path, PathBuf};

use super::ids::LogId;

/// A log file that currently exists on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    /// Logical identity of the file
    pub id: LogId,
    /// Current location of the file
    pub path: PathBuf,
}

impl LogFile {
    /// Create a new LogFile
    pub fn new(id: LogId, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }

    /// Derive a LogFile from a path, using the file stem as the identity
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let stem = path.file_stem()?.to_str()?;
        let id = LogId::parse(stem)?;
        Some(Self { id, path })
    }

    /// The folder that contains this log file
    pub fn folder(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// File extension including its leading dot, or an empty string
    pub fn extension(&self) -> String {
        extension_of(&self.path)
    }
}

/// File extension of `path` including its leading dot, or an empty string
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
