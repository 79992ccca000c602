//! Backup coordinator
//!
//! Decides whether a log may be backed up, makes room among its numbered
//! backups and copies it into slot 1. Requests for logs that aren't eligible
//! yet wait in a [`PendingQueue`] and are replayed at the end of the next
//! reconciliation pass.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::path_format::{backup_path, BACKUP_FOLDER_NAME};
use super::pending::{BackupRequest, PendingQueue};
use super::providers::{CandidateProvider, SourceResolver, StorageRoot};
use super::retention::{RetentionEngine, RetentionPolicy};
use super::slots::{scan, BackupListing, BackupSlot};
use crate::config::{
    LogkeepPaths, SettingKey, SettingValue, Settings, SettingsChange, SettingsObserver,
};
use crate::error::{LogkeepError, LogkeepResult};
use crate::models::log_file::extension_of;
use crate::models::{BackupSnapshot, EntryChange, EntryLists, LogId};
use crate::services::EntryReconciler;
use crate::storage::{safe_copy, ListStore, Retry};

/// Result of one backup request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupStatus {
    /// The log was copied into slot 1
    Copied { destination: PathBuf },
    /// No source file exists for the log
    Skipped,
    /// Backups are off or the log isn't enabled; the request was queued
    Pending,
    /// Copying into slot 1 failed
    Failed,
}

/// Counts of each status over a folder pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub copied: usize,
    pub skipped: usize,
    pub pending: usize,
    pub failed: usize,
    /// Logs left out because they are disabled; nothing is queued for them
    pub disabled: usize,
}

impl PassReport {
    fn record(&mut self, status: &BackupStatus) {
        match status {
            BackupStatus::Copied { .. } => self.copied += 1,
            BackupStatus::Skipped => self.skipped += 1,
            BackupStatus::Pending => self.pending += 1,
            BackupStatus::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.copied + self.skipped + self.pending + self.failed + self.disabled
    }
}

/// Owns the backup state of one logs folder
pub struct BackupCoordinator {
    root: Box<dyn StorageRoot>,
    root_override: Option<PathBuf>,
    allow_backups: bool,
    policy: RetentionPolicy,
    retry: Retry,
    engine: RetentionEngine,
    reconciler: EntryReconciler,
    snapshot: BackupSnapshot,
    pending: PendingQueue,
    listing: Option<BackupListing>,
}

impl BackupCoordinator {
    /// Create a coordinator with backups off and the default policy
    pub fn new(root: Box<dyn StorageRoot>, reconciler: EntryReconciler) -> Self {
        let retry = Retry::default();
        Self {
            root,
            root_override: None,
            allow_backups: false,
            policy: RetentionPolicy::default(),
            retry,
            engine: RetentionEngine::new(retry),
            reconciler,
            snapshot: BackupSnapshot::default(),
            pending: PendingQueue::new(),
            listing: None,
        }
    }

    /// Build a coordinator from the user's settings and list files
    pub fn from_settings(settings: &Settings, paths: &LogkeepPaths) -> LogkeepResult<Self> {
        let store = ListStore::new(paths.allow_list_file(), paths.deny_list_file());
        let defaults: Vec<LogId> = settings
            .enabled_by_default
            .iter()
            .filter_map(|token| LogId::parse(token))
            .collect();
        let reconciler = EntryReconciler::load(store, &defaults, settings.folder_order.clone())?;

        let mut coordinator = Self::new(Box::new(paths.default_logs_dir()), reconciler)
            .with_policy(settings.retention_policy())
            .with_retry(Retry::attempts(settings.retry_attempts))
            .with_backups_allowed(settings.allow_backups);
        coordinator.root_override = settings.logs_folder.clone();
        Ok(coordinator)
    }

    pub fn with_policy(mut self, policy: RetentionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_retry(mut self, retry: Retry) -> Self {
        self.retry = retry;
        self.engine = RetentionEngine::new(retry);
        self
    }

    pub fn with_backups_allowed(mut self, allow: bool) -> Self {
        self.allow_backups = allow;
        self
    }

    /// Folder holding the logs and the `Backup` folder
    pub fn storage_root(&self) -> PathBuf {
        self.root_override
            .clone()
            .unwrap_or_else(|| self.root.storage_root())
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.storage_root().join(BACKUP_FOLDER_NAME)
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    pub fn backups_allowed(&self) -> bool {
        self.allow_backups
    }

    pub fn snapshot(&self) -> &BackupSnapshot {
        &self.snapshot
    }

    pub fn lists(&self) -> &EntryLists {
        self.reconciler.lists()
    }

    pub fn pending(&self) -> &PendingQueue {
        &self.pending
    }

    /// Rebuild the snapshot from `provider` and the lists
    ///
    /// When backups are allowed, every enabled log with a pending request is
    /// backed up afterwards. Returns the number of pending requests applied.
    pub fn reconcile(
        &mut self,
        provider: &dyn CandidateProvider,
        resolver: &dyn SourceResolver,
    ) -> usize {
        self.snapshot.clear();
        let candidates = provider.candidates();
        self.snapshot = self
            .reconciler
            .reconcile(&candidates, self.policy.progressive_enable);
        debug!(entries = self.snapshot.len(), "Reconciliation finished");

        let applied = if self.allow_backups {
            self.replay_pending(resolver)
        } else {
            0
        };

        self.finish_pass();
        applied
    }

    fn replay_pending(&mut self, resolver: &dyn SourceResolver) -> usize {
        let ready: Vec<LogId> = self
            .snapshot
            .enabled_ids()
            .filter(|id| self.pending.contains(id))
            .cloned()
            .collect();

        let mut applied = 0;
        for id in ready {
            let Some(request) = self.pending.take(&id) else {
                continue;
            };
            let status = self.copy_backup(&request, resolver);
            info!(log = %id, ?status, "Pending backup applied");
            applied += 1;
        }
        applied
    }

    /// Back up one log, or queue the request when it isn't eligible
    pub fn request_backup(
        &mut self,
        request: BackupRequest,
        resolver: &dyn SourceResolver,
    ) -> BackupStatus {
        let status = self.submit(request, resolver);
        self.finish_pass();
        status
    }

    /// Back up every log `provider` reports
    ///
    /// While backups are off every log is queued as pending, as
    /// [`request_backup`](Self::request_backup) would. Otherwise disabled logs
    /// are only counted, so a one-shot run doesn't report them as waiting.
    pub fn backup_candidates(
        &mut self,
        provider: &dyn CandidateProvider,
        resolver: &dyn SourceResolver,
    ) -> PassReport {
        let mut report = PassReport::default();
        let mut seen = Vec::new();

        for candidate in provider.candidates() {
            if seen.contains(&candidate.id) {
                continue;
            }
            seen.push(candidate.id.clone());

            if self.allow_backups && !self.snapshot.is_enabled(&candidate.id) {
                debug!(log = %candidate.id, "Backups disabled for log");
                report.disabled += 1;
                continue;
            }

            let status = self.submit(BackupRequest::from(&candidate), resolver);
            report.record(&status);
        }

        self.finish_pass();
        info!(
            copied = report.copied,
            skipped = report.skipped,
            pending = report.pending,
            failed = report.failed,
            disabled = report.disabled,
            "Backup pass finished"
        );
        report
    }

    fn submit(&mut self, request: BackupRequest, resolver: &dyn SourceResolver) -> BackupStatus {
        if !self.allow_backups || !self.snapshot.is_enabled(&request.id) {
            self.pending.push(request);
            return BackupStatus::Pending;
        }
        self.copy_backup(&request, resolver)
    }

    fn resolve_source(request: &BackupRequest, resolver: &dyn SourceResolver) -> Option<PathBuf> {
        if request.source.is_file() {
            return Some(request.source.clone());
        }
        resolver
            .resolve_source(&request.id)
            .filter(|path| path.is_file())
    }

    fn copy_backup(&mut self, request: &BackupRequest, resolver: &dyn SourceResolver) -> BackupStatus {
        let Some(source) = Self::resolve_source(request, resolver) else {
            debug!(log = %request.id, "No source file, backup skipped");
            return BackupStatus::Skipped;
        };

        let backup_dir = self.backup_dir();
        if let Err(err) = fs::create_dir_all(&backup_dir) {
            warn!(dir = %backup_dir.display(), error = %err, "Unable to create backup folder");
            return BackupStatus::Failed;
        }

        let mut listing = match self.listing.take() {
            Some(listing) => listing,
            None => match BackupListing::read(&backup_dir) {
                Ok(listing) => listing,
                Err(err) => {
                    warn!(error = %err, "Unable to list backup folder");
                    return BackupStatus::Failed;
                }
            },
        };

        let name = request.id.as_str();
        let outcome = self
            .engine
            .make_room(&mut listing, name, self.policy.max_slots);
        if outcome.failed > 0 {
            warn!(log = name, failed = outcome.failed, "Some backups could not be rotated");
        }

        let destination = backup_path(&backup_dir, name, &extension_of(&source), 1);
        let status = match safe_copy(&source, &destination, self.retry) {
            Ok(bytes) => {
                listing.insert(destination.clone());
                info!(log = name, bytes, destination = %destination.display(), "Backup created");
                BackupStatus::Copied { destination }
            }
            Err(err) => {
                warn!(log = name, error = %err, "Backup copy failed");
                BackupStatus::Failed
            }
        };

        self.listing = Some(listing);
        status
    }

    /// The backups of `id`, ascending by slot
    pub fn existing_backups(&self, id: &LogId) -> LogkeepResult<Vec<BackupSlot>> {
        let listing = BackupListing::read(&self.backup_dir())?;
        Ok(scan(&listing, id.as_str()))
    }

    /// Delete every file in the backup folder and recreate it empty
    ///
    /// Returns the number of files removed, including those in subfolders.
    pub fn purge(&mut self) -> LogkeepResult<usize> {
        let backup_dir = self.backup_dir();
        self.listing = None;

        let removed = count_files(&backup_dir)?;
        if backup_dir.exists() {
            fs::remove_dir_all(&backup_dir).map_err(|e| {
                LogkeepError::Io(format!("Failed to remove backup folder: {}", e))
            })?;
        }
        fs::create_dir_all(&backup_dir).map_err(|e| {
            LogkeepError::Io(format!("Failed to create backup folder: {}", e))
        })?;

        info!(dir = %backup_dir.display(), removed, "Backup folder purged");
        Ok(removed)
    }

    /// Apply enabled-state edits to the lists and the snapshot
    pub fn process_changes(&mut self, changes: &[EntryChange]) -> usize {
        self.reconciler.apply_changes(changes, &mut self.snapshot)
    }

    /// Apply the difference between a mirrored list of enabled flags and the
    /// snapshot
    pub fn process_mirror(&mut self, mirrored: &[bool]) -> usize {
        let changes = self.snapshot.changes_from_mirror(mirrored);
        if changes.is_empty() {
            return 0;
        }
        self.process_changes(&changes)
    }

    /// Release the backup folder listing held for the current pass
    pub fn finish_pass(&mut self) {
        self.listing = None;
    }

    /// Flush the lists to disk
    pub fn shutdown(&mut self) -> LogkeepResult<()> {
        self.finish_pass();
        self.reconciler.save()
    }
}

fn count_files(dir: &Path) -> LogkeepResult<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            count += count_files(&path)?;
        } else {
            count += 1;
        }
    }
    Ok(count)
}

impl SettingsObserver for BackupCoordinator {
    fn settings_changed(&mut self, change: &SettingsChange) {
        match (change.key, &change.value) {
            (SettingKey::AllowBackups, SettingValue::Bool(flag)) => {
                self.allow_backups = *flag;
            }
            (SettingKey::ProgressiveEnable, SettingValue::Bool(flag)) => {
                self.policy.progressive_enable = *flag;
            }
            (SettingKey::BackupsPerFile, SettingValue::Count(count)) => {
                self.policy = RetentionPolicy::new(*count, self.policy.progressive_enable);
            }
            (SettingKey::RetryAttempts, SettingValue::Count(count)) => {
                self.retry = Retry {
                    attempts: (*count).max(1),
                    ..self.retry
                };
                self.engine = RetentionEngine::new(self.retry);
            }
            (SettingKey::LogsFolder, SettingValue::Path(path)) => {
                self.root_override = path.clone();
                self.listing = None;
            }
            (key, value) => {
                warn!(setting = %key, value = %value, "Ignoring mismatched setting change");
                return;
            }
        }
        debug!(setting = %change.key, "Coordinator updated");
    }
}
