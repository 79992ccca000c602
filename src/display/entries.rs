//! Entry display formatting
//!
//! Formats the reconciled snapshot for terminal output.

use crate::backup::PendingQueue;
use crate::models::{BackupSnapshot, EntryLists};

/// Format the snapshot as a table of logs and their backup state
pub fn format_entry_list(snapshot: &BackupSnapshot, pending: &PendingQueue) -> String {
    if snapshot.is_empty() {
        return "No logs found.".to_string();
    }

    let name_width = snapshot
        .iter()
        .map(|r| r.id.as_str().len())
        .max()
        .unwrap_or(3)
        .max(3);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<8}  {}\n",
        "Log",
        "Backups",
        "Folder",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<8}  {:-<20}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for record in snapshot.iter() {
        let state = if record.enabled { "on" } else { "off" };
        let folder = match &record.folder {
            Some(folder) => folder.display().to_string(),
            None => "(not found)".to_string(),
        };
        let marker = if pending.contains(&record.id) {
            "  [pending]"
        } else {
            ""
        };

        output.push_str(&format!(
            "{:<name_width$}  {:<8}  {}{}\n",
            record.id,
            state,
            folder,
            marker,
            name_width = name_width,
        ));
    }

    let enabled = snapshot.iter().filter(|r| r.enabled).count();
    output.push_str(&format!(
        "\n{} log(s), {} with backups enabled\n",
        snapshot.len(),
        enabled
    ));

    output
}

/// Format the persisted lists
pub fn format_lists(lists: &EntryLists) -> String {
    let join = |ids: &[crate::models::LogId]| {
        if ids.is_empty() {
            "(none)".to_string()
        } else {
            ids.iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    };

    format!(
        "Enabled:  {}\nDisabled: {}\n",
        join(lists.enabled()),
        join(lists.disabled())
    )
}
