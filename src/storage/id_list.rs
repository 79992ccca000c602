//! Persisted identity lists
//!
//! Plain text, one identity per line. Lines starting with `//` or `#` and blank
//! lines are ignored. Tokens that cannot name a log are dropped silently.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::file_io::write_lines_atomic;
use crate::error::{LogkeepError, LogkeepResult};
use crate::models::{EntryLists, LogId};

/// Parse the contents of a list file
pub fn parse_id_list(contents: &str) -> Vec<LogId> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//") && !line.starts_with('#'))
        .filter_map(LogId::parse)
        .collect()
}

/// Read a list file; a missing file is an empty list
pub fn read_id_list(path: &Path) -> LogkeepResult<Vec<LogId>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LogkeepError::Storage(format!("Failed to read {}: {}", path.display(), e))
    })?;

    Ok(parse_id_list(&contents))
}

/// Write a list file, replacing its previous contents
pub fn write_id_list(path: &Path, ids: &[LogId]) -> LogkeepResult<()> {
    write_lines_atomic(path, ids.iter().map(LogId::as_str))
}

/// Location of the allow and deny list files
#[derive(Debug, Clone)]
pub struct ListStore {
    allow_path: PathBuf,
    deny_path: PathBuf,
}

impl ListStore {
    pub fn new(allow_path: PathBuf, deny_path: PathBuf) -> Self {
        Self {
            allow_path,
            deny_path,
        }
    }

    pub fn allow_path(&self) -> &Path {
        &self.allow_path
    }

    pub fn deny_path(&self) -> &Path {
        &self.deny_path
    }

    /// Load both lists; an identity named in both ends up enabled
    pub fn load(&self) -> LogkeepResult<EntryLists> {
        let disabled = read_id_list(&self.deny_path)?;
        let enabled = read_id_list(&self.allow_path)?;
        debug!(
            enabled = enabled.len(),
            disabled = disabled.len(),
            "Loaded backup lists"
        );
        Ok(EntryLists::from_parts(enabled, disabled))
    }

    /// Write both lists to disk
    pub fn save(&self, lists: &EntryLists) -> LogkeepResult<()> {
        debug!("Writing backup lists");
        write_id_list(&self.deny_path, lists.disabled())?;
        write_id_list(&self.allow_path, lists.enabled())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn id(s: &str) -> LogId {
        LogId::parse(s).unwrap()
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let contents = "// allow list\n# console is on by default\n\n  console  \nmods\n\t\nbad/token\n";
        assert_eq!(parse_id_list(contents), vec![id("console"), id("mods")]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let ids = read_id_list(&temp_dir.path().join("nope.txt")).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_identities() {
        let temp_dir = TempDir::new().unwrap();
        let store = ListStore::new(
            temp_dir.path().join("allow.txt"),
            temp_dir.path().join("deny.txt"),
        );
        let lists = EntryLists::from_parts(
            vec![id("exception"), id("console")],
            vec![id("mods"), id("jolly")],
        );

        store.save(&lists).unwrap();
        // Comments added by hand must not disturb the reload
        let allow = fs::read_to_string(store.allow_path()).unwrap();
        fs::write(store.allow_path(), format!("# edited\n{}\n", allow)).unwrap();

        let loaded = store.load().unwrap();
        let as_set = |ids: &[LogId]| ids.iter().cloned().collect::<BTreeSet<_>>();
        assert_eq!(as_set(loaded.enabled()), as_set(lists.enabled()));
        assert_eq!(as_set(loaded.disabled()), as_set(lists.disabled()));
    }

    #[test]
    fn test_load_enabled_wins_over_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let store = ListStore::new(
            temp_dir.path().join("allow.txt"),
            temp_dir.path().join("deny.txt"),
        );
        fs::write(store.allow_path(), "console\n").unwrap();
        fs::write(store.deny_path(), "console\nmods\n").unwrap();

        let lists = store.load().unwrap();
        assert_eq!(lists.enabled(), &[id("console")]);
        assert_eq!(lists.disabled(), &[id("mods")]);
    }
}
