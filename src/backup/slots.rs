//! Backup slot discovery
//!
//! A [`BackupListing`] is a snapshot of the backup folder taken once per pass.
//! [`scan`] picks out the slots that belong to one logical name, ordered by
//! slot number. Files that don't match the canonical pattern are never
//! reported, so they are never moved or deleted.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LogkeepError, LogkeepResult};

use super::path_format::BACKUP_MARKER;

/// One existing backup file and the slot it occupies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSlot {
    pub path: PathBuf,
    pub slot: u32,
}

impl BackupSlot {
    pub fn new(path: impl Into<PathBuf>, slot: u32) -> Self {
        Self {
            path: path.into(),
            slot,
        }
    }

    /// Extension of the backup file, including its leading dot
    pub fn extension(&self) -> String {
        crate::models::log_file::extension_of(&self.path)
    }
}

/// The files of the backup folder, read once and kept current as a pass
/// moves, deletes and creates backups
#[derive(Debug, Clone, Default)]
pub struct BackupListing {
    files: Vec<PathBuf>,
}

impl BackupListing {
    /// Read the files of `dir`; a missing directory is an empty listing
    pub fn read(dir: &Path) -> LogkeepResult<Self> {
        if !dir.exists() {
            return Ok(Self::default());
        }

        let entries = fs::read_dir(dir).map_err(|e| {
            LogkeepError::Io(format!("Failed to read backup directory: {}", e))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                LogkeepError::Io(format!("Failed to read directory entry: {}", e))
            })?;
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }

        Ok(Self { files })
    }

    pub fn from_paths(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Record that `path` no longer exists
    pub fn remove(&mut self, path: &Path) {
        self.files.retain(|file| file != path);
    }

    /// Record that `path` now exists
    pub fn insert(&mut self, path: PathBuf) {
        if !self.files.contains(&path) {
            self.files.push(path);
        }
    }

    /// Record that `from` was renamed to `to`
    pub fn rename(&mut self, from: &Path, to: PathBuf) {
        self.remove(from);
        self.insert(to);
    }
}

/// Parse the slot number from a backup file stem such as `console_bkp[12]`
///
/// Returns `None` unless the stem is exactly `{name}_bkp[<digits>]` with a
/// slot of at least 1 written without leading zeros.
pub fn parse_slot_number(stem: &str, name: &str) -> Option<u32> {
    let digits = stem
        .strip_prefix(name)?
        .strip_prefix(BACKUP_MARKER)?
        .strip_prefix('[')?
        .strip_suffix(']')?;

    if digits.is_empty()
        || digits.starts_with('0')
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    digits.parse::<u32>().ok().filter(|slot| *slot >= 1)
}

/// Find the backups of `name` in `listing`, ascending by slot number
///
/// Listings are usually already in slot order, so each slot is appended when
/// it is the highest seen so far and otherwise inserted by walking back from
/// the tail. Duplicate slot numbers are kept in encounter order.
pub fn scan(listing: &BackupListing, name: &str) -> Vec<BackupSlot> {
    let mut slots: Vec<BackupSlot> = Vec::new();

    for path in listing.files() {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(slot) = parse_slot_number(stem, name) else {
            continue;
        };

        let mut index = slots.len();
        while index > 0 && slots[index - 1].slot > slot {
            index -= 1;
        }
        slots.insert(index, BackupSlot::new(path.clone(), slot));
    }

    slots
}
