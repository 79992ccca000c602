//! Backup requests waiting for their log to become eligible

use std::path::PathBuf;

use tracing::info;

use crate::models::{LogFile, LogId};

/// A request to back up one log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRequest {
    pub id: LogId,
    /// Where the log was when the request was made
    pub source: PathBuf,
}

impl BackupRequest {
    pub fn new(id: LogId, source: impl Into<PathBuf>) -> Self {
        Self {
            id,
            source: source.into(),
        }
    }
}

impl From<&LogFile> for BackupRequest {
    fn from(file: &LogFile) -> Self {
        Self::new(file.id.clone(), file.path.clone())
    }
}

/// At most one waiting request per log, in arrival order
#[derive(Debug, Clone, Default)]
pub struct PendingQueue {
    requests: Vec<BackupRequest>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `request`, replacing any request already waiting for the same log
    ///
    /// Returns the replaced request.
    pub fn push(&mut self, request: BackupRequest) -> Option<BackupRequest> {
        let dropped = self
            .requests
            .iter()
            .position(|queued| queued.id == request.id)
            .map(|index| self.requests.remove(index));

        if let Some(dropped) = &dropped {
            info!(log = %dropped.id, "Pending backup dropped");
        }
        info!(log = %request.id, "Backup pending");

        self.requests.push(request);
        dropped
    }

    /// Remove and return the request waiting for `id`
    pub fn take(&mut self, id: &LogId) -> Option<BackupRequest> {
        let index = self.requests.iter().position(|queued| &queued.id == id)?;
        Some(self.requests.remove(index))
    }

    pub fn contains(&self, id: &LogId) -> bool {
        self.requests.iter().any(|queued| &queued.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BackupRequest> {
        self.requests.iter()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
