//! Entry CLI commands
//!
//! Lists the reconciled logs and toggles backups for individual logs.

use std::path::PathBuf;
use std::str::FromStr;

use super::scanner_for;
use crate::backup::BackupCoordinator;
use crate::config::{LogkeepPaths, Settings};
use crate::display::{format_entry_list, format_lists};
use crate::error::LogkeepResult;
use crate::models::{EntryChange, LogId};

/// Show every known log and whether it is backed up
pub fn handle_list_command(
    paths: &LogkeepPaths,
    settings: &Settings,
    extra_folders: &[PathBuf],
    show_lists: bool,
) -> LogkeepResult<()> {
    let mut coordinator = BackupCoordinator::from_settings(settings, paths)?;
    let scanner = scanner_for(&coordinator, extra_folders);
    coordinator.reconcile(&scanner, &scanner);

    println!("{}", format_entry_list(coordinator.snapshot(), coordinator.pending()));
    if show_lists {
        println!();
        print!("{}", format_lists(coordinator.lists()));
    }

    coordinator.shutdown()
}

/// Enable or disable backups for the named logs
pub fn handle_toggle_command(
    paths: &LogkeepPaths,
    settings: &Settings,
    names: &[String],
    enabled: bool,
) -> LogkeepResult<()> {
    let ids = names
        .iter()
        .map(|name| LogId::from_str(name))
        .collect::<LogkeepResult<Vec<_>>>()?;

    let mut coordinator = BackupCoordinator::from_settings(settings, paths)?;
    let scanner = scanner_for(&coordinator, &[]);
    coordinator.reconcile(&scanner, &scanner);

    let changes: Vec<EntryChange> = ids
        .iter()
        .map(|id| EntryChange::new(id.clone(), enabled))
        .collect();
    let changed = coordinator.process_changes(&changes);

    let verb = if enabled { "Enabled" } else { "Disabled" };
    for id in &ids {
        println!("{} backups for {}", verb, id);
    }
    if changed < ids.len() {
        println!("{} log(s) were already {}", ids.len() - changed, verb.to_lowercase());
    }

    coordinator.shutdown()
}
