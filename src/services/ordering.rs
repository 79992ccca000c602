//! Snapshot ordering
//!
//! Entries sort by name ignoring case. Entries whose names only differ in
//! case are ordered by the folder the log lives in: the alternate root first
//! (logs only known from the lists count as living there), then the primary
//! root, then every other folder alphabetically.

use std::cmp::Ordering;
use std::path::Path;

use crate::config::FolderOrder;
use crate::models::EntryRecord;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum FolderRank {
    Alternate,
    Primary,
    Other(String),
}

fn folder_rank(folder: Option<&Path>, order: &FolderOrder) -> FolderRank {
    let Some(folder) = folder else {
        return FolderRank::Alternate;
    };

    let name = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if name.eq_ignore_ascii_case(&order.alternate_root) {
        FolderRank::Alternate
    } else if name.eq_ignore_ascii_case(&order.primary_root) {
        FolderRank::Primary
    } else {
        FolderRank::Other(folder.to_string_lossy().to_lowercase())
    }
}

/// Compare two storage folders
pub fn compare_folders(a: Option<&Path>, b: Option<&Path>, order: &FolderOrder) -> Ordering {
    folder_rank(a, order).cmp(&folder_rank(b, order))
}

/// Compare two snapshot entries by name, then by folder
pub fn compare_entries(a: &EntryRecord, b: &EntryRecord, order: &FolderOrder) -> Ordering {
    a.id.cmp_ignore_case(&b.id).then_with(|| {
        compare_folders(a.folder.as_deref(), b.folder.as_deref(), order)
    })
}
