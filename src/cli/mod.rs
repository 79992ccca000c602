//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the backup coordinator.

pub mod backup;
pub mod config;
pub mod entries;

pub use backup::{handle_purge_command, handle_run_command, handle_slots_command};
pub use config::{handle_config_command, handle_init_command, ConfigCommands};
pub use entries::{handle_list_command, handle_toggle_command};

use std::path::PathBuf;

use crate::backup::{BackupCoordinator, FolderScanner};

/// Scanner over the storage root followed by any extra folders
pub fn scanner_for(coordinator: &BackupCoordinator, extra_folders: &[PathBuf]) -> FolderScanner {
    let mut folders = vec![coordinator.storage_root()];
    folders.extend(extra_folders.iter().cloned());
    FolderScanner::new(folders)
}
