//! Retention of numbered backups
//!
//! Before a new backup is written to slot 1, every existing backup of the same
//! log moves up one slot and whatever would end up beyond the cap is deleted.
//! Planning is pure; applying the plan touches the disk with bounded retries.

use std::path::PathBuf;

use tracing::{debug, warn};

use super::path_format::backup_file_name;
use super::slots::{scan, BackupListing, BackupSlot};
use crate::storage::file_io::{safe_delete, safe_move, Retry};

/// How many backups to keep and how new logs are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Backups kept per log, at least 1
    pub max_slots: u32,
    /// Whether newly detected logs are enabled unless explicitly disabled
    pub progressive_enable: bool,
}

impl RetentionPolicy {
    pub fn new(max_slots: u32, progressive_enable: bool) -> Self {
        Self {
            max_slots: max_slots.max(1),
            progressive_enable,
        }
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(crate::config::settings::DEFAULT_BACKUPS_PER_FILE, false)
    }
}

/// A single filesystem step of a retention plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetentionOp {
    Delete { path: PathBuf },
    Shift { from: PathBuf, to: PathBuf },
}

/// Plan the operations that free slot 1 for `name`
///
/// `existing` must be ascending by slot number, as returned by
/// [`scan`]. Backups are walked from the oldest down: the surplus over
/// `max_allowed` is deleted, the backup at rank `max_allowed` is deleted
/// because it would fall off the end after shifting, and every other backup is
/// moved to slot `rank + 1`, keeping its own extension.
///
/// The returned operations are in execution order and never overwrite a
/// backup that hasn't been moved yet: deletes first, then moves towards
/// lower slots from the lowest up, then moves towards higher slots from the
/// highest down. Moves onto the path a backup already has are left out, so
/// planning again right after applying a plan yields nothing.
pub fn plan(existing: &[BackupSlot], name: &str, max_allowed: u32) -> Vec<RetentionOp> {
    let max_allowed = max_allowed.max(1) as usize;
    let mut overflow = existing.len().saturating_sub(max_allowed);

    let mut deletes = Vec::new();
    let mut downward = Vec::new();
    let mut upward = Vec::new();

    for (index, backup) in existing.iter().enumerate().rev() {
        let rank = index + 1;

        if overflow > 0 {
            overflow -= 1;
            deletes.push(RetentionOp::Delete {
                path: backup.path.clone(),
            });
            continue;
        }

        if rank >= max_allowed {
            deletes.push(RetentionOp::Delete {
                path: backup.path.clone(),
            });
            continue;
        }

        let target = rank as u32 + 1;
        let to = backup
            .path
            .with_file_name(backup_file_name(name, &backup.extension(), target));
        if to == backup.path {
            continue;
        }

        let op = RetentionOp::Shift {
            from: backup.path.clone(),
            to,
        };
        if target < backup.slot {
            downward.push(op);
        } else {
            upward.push(op);
        }
    }

    // Collected highest rank first; downward moves must run lowest first
    downward.reverse();

    deletes.into_iter().chain(downward).chain(upward).collect()
}

/// Outcome of applying a retention plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionOutcome {
    /// Backups that existed before the plan ran
    pub existing: usize,
    /// Operations that succeeded
    pub applied: usize,
    /// Operations abandoned after exhausting their retries
    pub failed: usize,
}

/// Applies retention plans to the backup folder
#[derive(Debug, Clone, Copy, Default)]
pub struct RetentionEngine {
    retry: Retry,
}

impl RetentionEngine {
    pub fn new(retry: Retry) -> Self {
        Self { retry }
    }

    /// Shift and evict the backups of `name` so slot 1 is free
    ///
    /// A failed operation is logged and skipped; the rest of the plan still
    /// runs. `listing` is updated for every operation that succeeded.
    pub fn make_room(
        &self,
        listing: &mut BackupListing,
        name: &str,
        max_allowed: u32,
    ) -> RetentionOutcome {
        let existing = scan(listing, name);
        debug!(name, existing = existing.len(), "Existing backups detected");

        let ops = plan(&existing, name, max_allowed);
        let mut outcome = self.apply(&ops, listing);
        outcome.existing = existing.len();
        outcome
    }

    /// Run `ops` in order
    pub fn apply(&self, ops: &[RetentionOp], listing: &mut BackupListing) -> RetentionOutcome {
        let mut outcome = RetentionOutcome::default();

        for op in ops {
            let result = match op {
                RetentionOp::Delete { path } => {
                    safe_delete(path, self.retry).map(|_| listing.remove(path))
                }
                RetentionOp::Shift { from, to } => {
                    safe_move(from, to, self.retry).map(|_| listing.rename(from, to.clone()))
                }
            };

            match result {
                Ok(()) => outcome.applied += 1,
                Err(err) => {
                    warn!(error = %err, "Retention step abandoned");
                    outcome.failed += 1;
                }
            }
        }

        outcome
    }
}
