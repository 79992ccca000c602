//! Backup slot display formatting
//!
//! Formats the numbered backups of a log and the outcome of a backup pass.

use std::fs;

use chrono::{DateTime, Local};

use crate::backup::{BackupSlot, PassReport};

/// Metadata about one backup file
#[derive(Debug, Clone)]
pub struct SlotInfo {
    pub slot: u32,
    pub filename: String,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Local>>,
}

impl SlotInfo {
    /// Read the metadata of `slot`; a file that vanished reports zero bytes
    pub fn read(slot: &BackupSlot) -> Self {
        let metadata = fs::metadata(&slot.path).ok();
        let filename = slot
            .path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| slot.path.display().to_string());

        Self {
            slot: slot.slot,
            filename,
            size_bytes: metadata.as_ref().map_or(0, |m| m.len()),
            modified: metadata
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Local>::from),
        }
    }
}

/// Format the backups of one log, newest first
pub fn format_slot_list(name: &str, slots: &[SlotInfo]) -> String {
    if slots.is_empty() {
        return format!("No backups of '{}' found.", name);
    }

    let file_width = slots
        .iter()
        .map(|s| s.filename.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>4}  {:<file_width$}  {:>10}  {}\n",
        "Slot",
        "File",
        "Size",
        "Modified",
        file_width = file_width,
    ));
    output.push_str(&format!(
        "{:->4}  {:-<file_width$}  {:->10}  {:-<19}\n",
        "",
        "",
        "",
        "",
        file_width = file_width,
    ));

    for info in slots {
        let modified = info
            .modified
            .map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());

        output.push_str(&format!(
            "{:>4}  {:<file_width$}  {:>10}  {}\n",
            info.slot,
            info.filename,
            format_size(info.size_bytes),
            modified,
            file_width = file_width,
        ));
    }

    output
}

/// Summarize a backup pass
pub fn format_pass_report(report: &PassReport) -> String {
    let mut output = format!("Backed up {} log(s)", report.copied);

    let mut details = Vec::new();
    if report.pending > 0 {
        details.push(format!("{} pending", report.pending));
    }
    if report.skipped > 0 {
        details.push(format!("{} skipped", report.skipped));
    }
    if report.failed > 0 {
        details.push(format!("{} failed", report.failed));
    }
    if report.disabled > 0 {
        details.push(format!("{} disabled", report.disabled));
    }
    if !details.is_empty() {
        output.push_str(&format!(" ({})", details.join(", ")));
    }

    output
}

/// Format a file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
