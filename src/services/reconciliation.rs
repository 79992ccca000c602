//! Entry reconciliation service
//!
//! Merges the logs observed on disk with the user's enabled and disabled
//! lists into one ordered snapshot, auto-enabling new logs when progressive
//! enable is on, and keeps the lists on disk current.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::ordering::compare_entries;
use crate::config::FolderOrder;
use crate::error::LogkeepResult;
use crate::models::{BackupSnapshot, EntryChange, EntryLists, EntryRecord, LogFile, LogId};
use crate::storage::ListStore;

/// Where a candidate ended up after reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Membership {
    Enabled,
    Disabled,
}

/// Result of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Ordered state of every known identity
    pub snapshot: BackupSnapshot,
    /// The lists after auto-enabling new logs
    pub lists: EntryLists,
}

/// Merge observed logs with the enabled and disabled lists
///
/// Every candidate appears once in the snapshot (repeats of an identity are
/// ignored). Identities remembered in the lists but not observed are appended
/// with their listed state. With `progressive_enable`, a candidate named by
/// neither list is enabled and added to the enabled list; without it, such a
/// candidate is reported disabled but not added to either list.
pub fn reconcile_entries(
    candidates: &[LogFile],
    lists: &EntryLists,
    progressive_enable: bool,
    order: &FolderOrder,
) -> Reconciliation {
    let mut updated = lists.clone();
    let mut unclaimed_enabled: Vec<LogId> = lists.enabled().to_vec();
    let mut unclaimed_disabled: Vec<LogId> = lists.disabled().to_vec();
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(candidates.len() + unclaimed_enabled.len());

    for candidate in candidates {
        let id = &candidate.id;
        if !seen.insert(id.clone()) {
            continue;
        }

        let membership = if lists.is_enabled(id) {
            Membership::Enabled
        } else if lists.is_disabled(id) || !progressive_enable {
            Membership::Disabled
        } else {
            updated.enable(id);
            Membership::Enabled
        };

        debug!(log = %id, ?membership, "Backup candidate");

        unclaimed_enabled.retain(|known| known != id);
        unclaimed_disabled.retain(|known| known != id);

        records.push(EntryRecord {
            id: id.clone(),
            enabled: membership == Membership::Enabled,
            folder: candidate.folder().map(|f| f.to_path_buf()),
        });
    }

    records.extend(
        unclaimed_enabled
            .into_iter()
            .map(|id| EntryRecord::remembered(id, true)),
    );
    records.extend(
        unclaimed_disabled
            .into_iter()
            .map(|id| EntryRecord::remembered(id, false)),
    );

    let mut snapshot = BackupSnapshot::new(records);
    snapshot.sort_by(|a, b| compare_entries(a, b, order));

    Reconciliation {
        snapshot,
        lists: updated,
    }
}

/// Owns the enabled/disabled lists and keeps them in step with their files
pub struct EntryReconciler {
    store: ListStore,
    lists: EntryLists,
    folder_order: FolderOrder,
}

impl EntryReconciler {
    /// Create a reconciler over already-loaded lists
    pub fn new(store: ListStore, lists: EntryLists, folder_order: FolderOrder) -> Self {
        Self {
            store,
            lists,
            folder_order,
        }
    }

    /// Load the lists from `store` and enable any default identity that
    /// neither list names
    pub fn load(
        store: ListStore,
        defaults: &[LogId],
        folder_order: FolderOrder,
    ) -> LogkeepResult<Self> {
        let mut lists = store.load()?;
        lists.apply_defaults(defaults);
        Ok(Self::new(store, lists, folder_order))
    }

    pub fn lists(&self) -> &EntryLists {
        &self.lists
    }

    /// Run a reconciliation pass and persist the resulting lists
    ///
    /// A failure to write the lists is logged; the snapshot is still
    /// returned.
    pub fn reconcile(&mut self, candidates: &[LogFile], progressive_enable: bool) -> BackupSnapshot {
        let Reconciliation { snapshot, lists } =
            reconcile_entries(candidates, &self.lists, progressive_enable, &self.folder_order);

        let newly_enabled = lists.enabled().len() - self.lists.enabled().len();
        if newly_enabled > 0 {
            info!(count = newly_enabled, "Enabled backups for newly detected logs");
        }
        self.lists = lists;
        self.save_logged();

        snapshot
    }

    /// Apply enabled-state changes to the lists and to `snapshot`
    ///
    /// Unknown identities are added to the requested list and to the
    /// snapshot. Returns the number of identities whose list membership
    /// changed.
    pub fn apply_changes(&mut self, changes: &[EntryChange], snapshot: &mut BackupSnapshot) -> usize {
        let mut changed = 0;
        let mut needs_sort = false;

        for change in changes {
            info!(log = %change.id, enabled = change.enabled, "Processing entry");

            let moved = if change.enabled {
                self.lists.enable(&change.id)
            } else {
                self.lists.disable(&change.id)
            };
            if moved {
                changed += 1;
            }

            needs_sort |= snapshot.set_enabled(&change.id, change.enabled);
        }

        if needs_sort {
            let order = &self.folder_order;
            snapshot.sort_by(|a, b| compare_entries(a, b, order));
        }

        if changed > 0 {
            self.save_logged();
        }

        changed
    }

    /// Write the lists to disk
    pub fn save(&self) -> LogkeepResult<()> {
        self.store.save(&self.lists)
    }

    fn save_logged(&self) {
        if let Err(err) = self.save() {
            warn!(error = %err, "Unable to write backup lists");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn id(s: &str) -> LogId {
        LogId::parse(s).unwrap()
    }

    fn candidates(names: &[&str]) -> Vec<LogFile> {
        names
            .iter()
            .map(|n| LogFile::new(id(n), format!("/games/Rain World/{}.log", n)))
            .collect()
    }

    fn states(snapshot: &BackupSnapshot) -> Vec<(String, bool)> {
        snapshot
            .iter()
            .map(|r| (r.id.to_string(), r.enabled))
            .collect()
    }

    fn store(dir: &TempDir) -> ListStore {
        ListStore::new(dir.path().join("allow.txt"), dir.path().join("deny.txt"))
    }

    #[test]
    fn test_progressive_enable_scenario() {
        let lists = EntryLists::from_parts(vec![], vec![id("mods")]);
        let result = reconcile_entries(
            &candidates(&["console", "mods", "exception"]),
            &lists,
            true,
            &FolderOrder::default(),
        );

        assert_eq!(
            states(&result.snapshot),
            vec![
                ("console".to_string(), true),
                ("exception".to_string(), true),
                ("mods".to_string(), false),
            ]
        );
        assert_eq!(result.lists.enabled(), &[id("console"), id("exception")]);
        assert_eq!(result.lists.disabled(), &[id("mods")]);
    }

    #[test]
    fn test_without_progressive_new_logs_are_disabled_but_unlisted() {
        let lists = EntryLists::from_parts(vec![id("console")], vec![]);
        let result = reconcile_entries(
            &candidates(&["console", "jolly"]),
            &lists,
            false,
            &FolderOrder::default(),
        );

        assert_eq!(
            states(&result.snapshot),
            vec![("console".to_string(), true), ("jolly".to_string(), false)]
        );
        assert_eq!(result.lists, lists);
    }

    #[test]
    fn test_remembered_entries_are_kept() {
        let lists = EntryLists::from_parts(vec![id("expedition")], vec![id("jolly")]);
        let result = reconcile_entries(
            &candidates(&["console"]),
            &lists,
            false,
            &FolderOrder::default(),
        );

        assert_eq!(
            states(&result.snapshot),
            vec![
                ("console".to_string(), false),
                ("expedition".to_string(), true),
                ("jolly".to_string(), false),
            ]
        );
        let expedition = result.snapshot.get(&id("expedition")).unwrap();
        assert!(expedition.folder.is_none());
    }

    #[test]
    fn test_every_identity_appears_once() {
        let lists = EntryLists::from_parts(
            vec![id("console"), id("expedition")],
            vec![id("mods"), id("jolly")],
        );
        let mut observed = candidates(&["console", "mods", "exception"]);
        observed.push(LogFile::new(id("console"), "/elsewhere/console.log"));

        let result = reconcile_entries(&observed, &lists, true, &FolderOrder::default());

        let mut names: Vec<String> = result.snapshot.iter().map(|r| r.id.to_string()).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["console", "exception", "expedition", "jolly", "mods"]
        );
    }

    #[test]
    fn test_case_variants_ordered_by_folder() {
        let observed = vec![
            LogFile::new(id("Console"), "/games/Rain World/Console.log"),
            LogFile::new(
                id("console"),
                "/games/Rain World/RainWorld_Data/StreamingAssets/console.log",
            ),
        ];
        let result = reconcile_entries(
            &observed,
            &EntryLists::default(),
            true,
            &FolderOrder::default(),
        );

        let order: Vec<&str> = result.snapshot.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["console", "Console"]);
    }

    #[test]
    fn test_reconciler_persists_lists() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("deny.txt"), "# off\nmods\n").unwrap();

        let mut reconciler =
            EntryReconciler::load(store(&dir), &[id("console")], FolderOrder::default()).unwrap();
        let snapshot = reconciler.reconcile(&candidates(&["console", "mods", "jolly"]), true);

        assert!(snapshot.is_enabled(&id("jolly")));
        let allow = fs::read_to_string(dir.path().join("allow.txt")).unwrap();
        assert_eq!(allow, "console\njolly\n");
        let deny = fs::read_to_string(dir.path().join("deny.txt")).unwrap();
        assert_eq!(deny, "mods\n");
    }

    #[test]
    fn test_apply_changes_moves_entries_and_saves() {
        let dir = TempDir::new().unwrap();
        let mut reconciler = EntryReconciler::new(
            store(&dir),
            EntryLists::from_parts(vec![id("console")], vec![id("mods")]),
            FolderOrder::default(),
        );
        let mut snapshot = reconciler.reconcile(&candidates(&["console", "mods"]), false);

        let changed = reconciler.apply_changes(
            &[
                EntryChange::new(id("console"), false),
                EntryChange::new(id("mods"), true),
                EntryChange::new(id("jolly"), true),
                EntryChange::new(id("mods"), true),
            ],
            &mut snapshot,
        );

        assert_eq!(changed, 3);
        assert_eq!(
            states(&snapshot),
            vec![
                ("console".to_string(), false),
                ("jolly".to_string(), true),
                ("mods".to_string(), true),
            ]
        );
        let allow = fs::read_to_string(dir.path().join("allow.txt")).unwrap();
        assert_eq!(allow, "mods\njolly\n");
    }
}
