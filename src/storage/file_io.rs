//! File I/O utilities with atomic writes and bounded retries
//!
//! Provides safe file operations that won't corrupt data on failure. Deletes,
//! moves and copies are retried a bounded number of times because log files
//! are frequently held open by the program writing them.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::error::LogkeepError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, LogkeepError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| LogkeepError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| LogkeepError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), LogkeepError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path.as_ref(), |writer| {
        serde_json::to_writer_pretty(writer, data)
            .map_err(|e| LogkeepError::Storage(format!("Failed to serialize data: {}", e)))
    })
}

/// Write one line per item to a file atomically, replacing its contents
pub fn write_lines_atomic<P, I, S>(path: P, lines: I) -> Result<(), LogkeepError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    write_atomic(path.as_ref(), |writer| {
        for line in lines {
            writeln!(writer, "{}", line.as_ref())
                .map_err(|e| LogkeepError::Storage(format!("Failed to write line: {}", e)))?;
        }
        Ok(())
    })
}

/// Write through a temp file in the same directory and rename it over `path`
///
/// The file is either completely written or not modified at all.
fn write_atomic<F>(path: &Path, fill: F) -> Result<(), LogkeepError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), LogkeepError>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            LogkeepError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let file = File::create(&temp_path)
        .map_err(|e| LogkeepError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    fill(&mut writer)?;

    writer
        .flush()
        .map_err(|e| LogkeepError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| LogkeepError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LogkeepError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Bounded retry policy for file operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retry {
    /// Total attempts, including the first
    pub attempts: u32,
    /// Pause after the first failure; grows linearly with each attempt
    pub backoff: Duration,
}

impl Default for Retry {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(25),
        }
    }
}

impl Retry {
    /// Retry policy with the default backoff
    pub fn attempts(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
            ..Self::default()
        }
    }

    /// Run `op` until it succeeds, fails with `NotFound`, or runs out of attempts
    ///
    /// Only the first failure is logged at warn level.
    pub fn run<T, F>(&self, action: &str, path: &Path, mut op: F) -> Result<T, LogkeepError>
    where
        F: FnMut() -> io::Result<T>,
    {
        let attempts = self.attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    return Err(LogkeepError::file_not_found(path.display().to_string()));
                }
                Err(err) => {
                    if attempt == 1 {
                        warn!(action, path = %path.display(), error = %err, "File operation failed");
                    } else {
                        debug!(action, attempt, error = %err, "Retry failed");
                    }
                    last_error = Some(err);
                    if attempt < attempts {
                        thread::sleep(self.backoff * attempt);
                    }
                }
            }
        }

        Err(LogkeepError::Io(format!(
            "Failed to {} {} after {} attempts: {}",
            action,
            path.display(),
            attempts,
            last_error.map(|e| e.to_string()).unwrap_or_default()
        )))
    }
}

/// Delete a file; a file that is already gone counts as deleted
pub fn safe_delete(path: &Path, retry: Retry) -> Result<(), LogkeepError> {
    match retry.run("delete", path, || fs::remove_file(path)) {
        Err(err) if err.is_not_found() => Ok(()),
        other => other,
    }
}

/// Move a file, replacing whatever is at the destination
pub fn safe_move(from: &Path, to: &Path, retry: Retry) -> Result<(), LogkeepError> {
    if from == to {
        return Ok(());
    }
    debug!(from = %from.display(), to = %to.display(), "Moving file");
    retry.run("move", from, || fs::rename(from, to))
}

/// Copy a file, replacing whatever is at the destination
pub fn safe_copy(from: &Path, to: &Path, retry: Retry) -> Result<u64, LogkeepError> {
    debug!(from = %from.display(), to = %to.display(), "Copying file");
    retry.run("copy", from, || fs::copy(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::cell::Cell;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn quick() -> Retry {
        Retry {
            attempts: 3,
            backoff: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let data: TestData = read_json(&path).unwrap();
        assert_eq!(data, TestData::default());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        write_json_atomic(&path, &data).unwrap();
        let loaded: TestData = read_json(&path).unwrap();
        assert_eq!(data, loaded);
        assert!(!temp_dir.path().join("test.json.tmp").exists());
    }

    #[test]
    fn test_write_lines_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("list.txt");

        write_lines_atomic(&path, ["one", "two", "three"]).unwrap();
        write_lines_atomic(&path, ["four"]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "four\n");
        assert!(!temp_dir.path().join("nested").join("list.txt.tmp").exists());
    }

    #[test]
    fn test_retry_gives_up_after_attempts() {
        let calls = Cell::new(0);
        let result: Result<(), _> = quick().run("touch", Path::new("x"), || {
            calls.set(calls.get() + 1);
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "in use"))
        });

        assert!(matches!(result, Err(LogkeepError::Io(_))));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_retry_recovers_from_transient_error() {
        let calls = Cell::new(0);
        let result = quick().run("touch", Path::new("x"), || {
            calls.set(calls.get() + 1);
            if calls.get() < 2 {
                Err(io::Error::new(io::ErrorKind::Other, "sharing violation"))
            } else {
                Ok(7)
            }
        });

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_retry_does_not_repeat_not_found() {
        let calls = Cell::new(0);
        let result: Result<(), _> = quick().run("copy", Path::new("gone.log"), || {
            calls.set(calls.get() + 1);
            Err(io::Error::new(io::ErrorKind::NotFound, "missing"))
        });

        assert!(result.unwrap_err().is_not_found());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_safe_delete_missing_file_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        safe_delete(&temp_dir.path().join("missing.log"), quick()).unwrap();
    }

    #[test]
    fn test_safe_move_replaces_destination() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("a.log");
        let to = temp_dir.path().join("b.log");
        fs::write(&from, "new").unwrap();
        fs::write(&to, "old").unwrap();

        safe_move(&from, &to, quick()).unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "new");
    }

    #[test]
    fn test_safe_copy_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let err = safe_copy(
            &temp_dir.path().join("missing.log"),
            &temp_dir.path().join("copy.log"),
            quick(),
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }
}
