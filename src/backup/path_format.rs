//! Canonical backup file names
//!
//! A backup of `console.log` in slot 2 is stored as `console_bkp[2].log`.

use std::path::{Path, PathBuf};

/// Marker between the logical name and the bracketed slot number
pub const BACKUP_MARKER: &str = "_bkp";

/// Name of the folder holding backups inside the storage root
pub const BACKUP_FOLDER_NAME: &str = "Backup";

/// File name of a backup; `extension` includes its leading dot or is empty
pub fn backup_file_name(name: &str, extension: &str, slot: u32) -> String {
    format!("{}{}[{}]{}", name, BACKUP_MARKER, slot, extension)
}

/// Full path of a backup inside `backup_dir`
pub fn backup_path(backup_dir: &Path, name: &str, extension: &str, slot: u32) -> PathBuf {
    backup_dir.join(backup_file_name(name, extension, slot))
}
