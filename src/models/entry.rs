//! Backup entries and the reconciled snapshot
//!
//! A `BackupSnapshot` is the ordered list of every identity the backup system
//! knows about together with its enabled state. It is rebuilt on each
//! reconciliation pass and is what a front end renders.

use std::cmp::Ordering;
use std::path::PathBuf;

use tracing::warn;

use super::ids::LogId;

/// One identity and whether backups are enabled for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    /// Logical identity
    pub id: LogId,
    /// Whether backups are enabled
    pub enabled: bool,
    /// Folder the log was observed in; `None` when only known from the lists
    pub folder: Option<PathBuf>,
}

impl EntryRecord {
    /// Create a record for an identity that was not observed on disk
    pub fn remembered(id: LogId, enabled: bool) -> Self {
        Self {
            id,
            enabled,
            folder: None,
        }
    }
}

/// A requested change of enabled state for one identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryChange {
    pub id: LogId,
    pub enabled: bool,
}

impl EntryChange {
    pub fn new(id: LogId, enabled: bool) -> Self {
        Self { id, enabled }
    }
}

/// Ordered enabled/disabled state of every known identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupSnapshot {
    records: Vec<EntryRecord>,
}

impl BackupSnapshot {
    pub fn new(records: Vec<EntryRecord>) -> Self {
        Self { records }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntryRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find the record for an identity
    pub fn get(&self, id: &LogId) -> Option<&EntryRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Whether backups are enabled for `id`; unknown identities are not
    pub fn is_enabled(&self, id: &LogId) -> bool {
        self.get(id).map_or(false, |r| r.enabled)
    }

    /// Identities with backups enabled, in snapshot order
    pub fn enabled_ids(&self) -> impl Iterator<Item = &LogId> {
        self.records.iter().filter(|r| r.enabled).map(|r| &r.id)
    }

    /// Set the enabled state of an identity
    ///
    /// Returns `true` when the identity was not present and a new record was
    /// appended, in which case the caller must re-sort.
    pub fn set_enabled(&mut self, id: &LogId, enabled: bool) -> bool {
        match self.records.iter_mut().find(|r| &r.id == id) {
            Some(record) => {
                record.enabled = enabled;
                false
            }
            None => {
                self.records
                    .push(EntryRecord::remembered(id.clone(), enabled));
                true
            }
        }
    }

    /// Stable sort with the given comparator
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&EntryRecord, &EntryRecord) -> Ordering,
    {
        self.records.sort_by(compare);
    }

    /// Compare a front end's mirrored list of enabled flags against this
    /// snapshot and return the entries whose state differs
    ///
    /// The mirror must list the entries in snapshot order. A length mismatch
    /// means the two lists are out of step; it is logged and no changes are
    /// reported.
    pub fn changes_from_mirror(&self, mirrored: &[bool]) -> Vec<EntryChange> {
        if mirrored.len() != self.records.len() {
            warn!(
                mirrored = mirrored.len(),
                managed = self.records.len(),
                "Backup entry count does not match managed entry count"
            );
            return Vec::new();
        }

        self.records
            .iter()
            .zip(mirrored)
            .filter(|(record, wanted)| record.enabled != **wanted)
            .map(|(record, wanted)| EntryChange::new(record.id.clone(), *wanted))
            .collect()
    }
}
