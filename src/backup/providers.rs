//! Collaborators the backup system consumes
//!
//! The coordinator never discovers logs or storage locations itself; it asks
//! these traits. [`FolderScanner`] is the implementation used by the command
//! line: it treats every `.log` and `.txt` file in a set of folders as a
//! candidate.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::models::{LogFile, LogId};

/// Extensions of files treated as logs
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["log", "txt"];

/// Provides the folder that holds the `Backup` folder
pub trait StorageRoot {
    fn storage_root(&self) -> PathBuf;
}

/// Provides the logs that currently exist, in a stable order
pub trait CandidateProvider {
    fn candidates(&self) -> Vec<LogFile>;
}

/// Finds the current location of a log
pub trait SourceResolver {
    fn resolve_source(&self, id: &LogId) -> Option<PathBuf>;
}

impl StorageRoot for PathBuf {
    fn storage_root(&self) -> PathBuf {
        self.clone()
    }
}

/// Whether `path` has one of the supported log extensions
pub fn is_supported_log(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Scans log folders for candidate files
#[derive(Debug, Clone, Default)]
pub struct FolderScanner {
    folders: Vec<PathBuf>,
}

impl FolderScanner {
    pub fn new(folders: Vec<PathBuf>) -> Self {
        Self { folders }
    }

    fn scan_folder(folder: &Path) -> Vec<LogFile> {
        let entries = match fs::read_dir(folder) {
            Ok(entries) => entries,
            Err(err) => {
                if folder.exists() {
                    warn!(folder = %folder.display(), error = %err, "Unable to read logs folder");
                }
                return Vec::new();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_supported_log(path))
            .collect();
        paths.sort();

        paths.into_iter().filter_map(LogFile::from_path).collect()
    }
}

impl CandidateProvider for FolderScanner {
    fn candidates(&self) -> Vec<LogFile> {
        self.folders
            .iter()
            .flat_map(|folder| Self::scan_folder(folder))
            .collect()
    }
}

impl SourceResolver for FolderScanner {
    fn resolve_source(&self, id: &LogId) -> Option<PathBuf> {
        self.candidates()
            .into_iter()
            .find(|file| &file.id == id)
            .map(|file| file.path)
    }
}
