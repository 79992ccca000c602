//! Backup CLI commands
//!
//! Implements the commands that create, inspect and purge backups.

use std::path::PathBuf;
use std::str::FromStr;

use super::scanner_for;
use crate::backup::BackupCoordinator;
use crate::config::{LogkeepPaths, Settings};
use crate::display::{format_pass_report, format_slot_list, SlotInfo};
use crate::error::LogkeepResult;
use crate::models::LogId;

/// Reconcile the logs folder and back up every enabled log
pub fn handle_run_command(
    paths: &LogkeepPaths,
    settings: &Settings,
    extra_folders: &[PathBuf],
) -> LogkeepResult<()> {
    let mut coordinator = BackupCoordinator::from_settings(settings, paths)?;
    let scanner = scanner_for(&coordinator, extra_folders);

    coordinator.reconcile(&scanner, &scanner);

    if !coordinator.backups_allowed() {
        println!("Backups are disabled.");
        println!("Enable them with: logkeep config set allow-backups true");
        coordinator.shutdown()?;
        return Ok(());
    }

    let report = coordinator.backup_candidates(&scanner, &scanner);
    println!("{}", format_pass_report(&report));
    println!("Location: {}", coordinator.backup_dir().display());

    coordinator.shutdown()
}

/// Show the numbered backups of one log
pub fn handle_slots_command(
    paths: &LogkeepPaths,
    settings: &Settings,
    name: &str,
) -> LogkeepResult<()> {
    let id = LogId::from_str(name)?;
    let coordinator = BackupCoordinator::from_settings(settings, paths)?;

    let slots: Vec<SlotInfo> = coordinator
        .existing_backups(&id)?
        .iter()
        .map(SlotInfo::read)
        .collect();

    println!("{}", format_slot_list(id.as_str(), &slots));
    if !slots.is_empty() {
        println!();
        println!(
            "Total: {} of {} slot(s)",
            slots.len(),
            coordinator.policy().max_slots
        );
    }

    Ok(())
}

/// Delete the whole backup folder
pub fn handle_purge_command(
    paths: &LogkeepPaths,
    settings: &Settings,
    force: bool,
) -> LogkeepResult<()> {
    let mut coordinator = BackupCoordinator::from_settings(settings, paths)?;
    let backup_dir = coordinator.backup_dir();

    if !force {
        println!("This will delete every file in {}", backup_dir.display());
        println!("To proceed, run again with --force flag:");
        println!("  logkeep purge --force");
        return Ok(());
    }

    let removed = coordinator.purge()?;
    println!("Deleted {} file(s) from {}", removed, backup_dir.display());
    Ok(())
}
