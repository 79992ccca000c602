//! User settings for logkeep
//!
//! Manages the backup switches, the retention cap and the folder ordering
//! keywords. Individual settings are addressed through [`SettingKey`] and
//! changes are announced to [`SettingsObserver`]s.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::paths::LogkeepPaths;
use crate::backup::retention::RetentionPolicy;
use crate::error::LogkeepError;
use crate::storage::file_io::{read_json, write_json_atomic};

/// Smallest accepted number of backups per file
pub const MIN_BACKUPS_PER_FILE: u32 = 1;

/// Largest accepted number of backups per file
pub const MAX_BACKUPS_PER_FILE: u32 = 5;

/// Number of backups per file kept by default
pub const DEFAULT_BACKUPS_PER_FILE: u32 = 2;

/// Attempts made for each file operation by default
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Keywords used to order entries that share a name but live in different
/// folders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderOrder {
    /// Folder name that sorts before every other folder
    pub alternate_root: String,
    /// Folder name that sorts right after the alternate root
    pub primary_root: String,
}

impl Default for FolderOrder {
    fn default() -> Self {
        Self {
            alternate_root: "StreamingAssets".to_string(),
            primary_root: "Rain World".to_string(),
        }
    }
}

/// User settings for logkeep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Folder holding the logs; the `Backup` folder is created inside it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs_folder: Option<PathBuf>,

    /// Whether backups may be made at all
    #[serde(default)]
    pub allow_backups: bool,

    /// Whether newly detected logs are enabled unless explicitly disabled
    #[serde(default)]
    pub progressive_enable: bool,

    /// Number of backups kept per log file
    #[serde(default = "default_backups_per_file")]
    pub backups_per_file: u32,

    /// Attempts made for each delete, move or copy
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Logs enabled on first sight unless a list already names them
    #[serde(default = "default_enabled_by_default")]
    pub enabled_by_default: Vec<String>,

    /// Tie-break ordering of entries with the same name
    #[serde(default)]
    pub folder_order: FolderOrder,
}

fn default_schema_version() -> u32 {
    1
}

fn default_backups_per_file() -> u32 {
    DEFAULT_BACKUPS_PER_FILE
}

fn default_retry_attempts() -> u32 {
    DEFAULT_RETRY_ATTEMPTS
}

fn default_enabled_by_default() -> Vec<String> {
    vec!["console".into(), "exception".into(), "mods".into()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            logs_folder: None,
            allow_backups: false,
            progressive_enable: false,
            backups_per_file: default_backups_per_file(),
            retry_attempts: default_retry_attempts(),
            enabled_by_default: default_enabled_by_default(),
            folder_order: FolderOrder::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LogkeepPaths) -> Result<Self, LogkeepError> {
        let settings_path = paths.settings_file();

        let mut settings: Settings = read_json(&settings_path).map_err(|e| {
            LogkeepError::Config(format!("Failed to load settings file: {}", e))
        })?;

        // Hand-edited files may hold values the menu would never produce
        settings.backups_per_file = settings
            .backups_per_file
            .clamp(MIN_BACKUPS_PER_FILE, MAX_BACKUPS_PER_FILE);
        settings.retry_attempts = settings.retry_attempts.max(1);

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LogkeepPaths) -> Result<(), LogkeepError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// The folder that holds the logs and the `Backup` folder
    pub fn storage_root(&self, paths: &LogkeepPaths) -> PathBuf {
        self.logs_folder
            .clone()
            .unwrap_or_else(|| paths.default_logs_dir())
    }

    /// Retention policy derived from these settings
    pub fn retention_policy(&self) -> RetentionPolicy {
        RetentionPolicy::new(self.backups_per_file, self.progressive_enable)
    }

    /// Read a setting through its key
    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::LogsFolder => SettingValue::Path(self.logs_folder.clone()),
            SettingKey::AllowBackups => SettingValue::Bool(self.allow_backups),
            SettingKey::ProgressiveEnable => SettingValue::Bool(self.progressive_enable),
            SettingKey::BackupsPerFile => SettingValue::Count(self.backups_per_file),
            SettingKey::RetryAttempts => SettingValue::Count(self.retry_attempts),
        }
    }

    /// Assign a setting through its key
    ///
    /// Returns the change that was applied, or `None` when the value was
    /// already current.
    pub fn set(
        &mut self,
        key: SettingKey,
        value: SettingValue,
    ) -> Result<Option<SettingsChange>, LogkeepError> {
        if self.get(key) == value {
            return Ok(None);
        }

        match (key, &value) {
            (SettingKey::LogsFolder, SettingValue::Path(path)) => {
                self.logs_folder = path.clone();
            }
            (SettingKey::AllowBackups, SettingValue::Bool(flag)) => {
                self.allow_backups = *flag;
            }
            (SettingKey::ProgressiveEnable, SettingValue::Bool(flag)) => {
                self.progressive_enable = *flag;
            }
            (SettingKey::BackupsPerFile, SettingValue::Count(count)) => {
                if !(MIN_BACKUPS_PER_FILE..=MAX_BACKUPS_PER_FILE).contains(count) {
                    return Err(LogkeepError::Validation(format!(
                        "backups-per-file must be between {} and {}, got {}",
                        MIN_BACKUPS_PER_FILE, MAX_BACKUPS_PER_FILE, count
                    )));
                }
                self.backups_per_file = *count;
            }
            (SettingKey::RetryAttempts, SettingValue::Count(count)) => {
                if *count == 0 {
                    return Err(LogkeepError::Validation(
                        "retry-attempts must be at least 1".into(),
                    ));
                }
                self.retry_attempts = *count;
            }
            (key, value) => {
                return Err(LogkeepError::Validation(format!(
                    "{} cannot hold the value '{}'",
                    key, value
                )));
            }
        }

        info!(setting = %key, value = %value, "Setting changed");
        Ok(Some(SettingsChange { key, value }))
    }

    /// Parse `raw` for `key`, assign it, and notify every observer of the change
    pub fn apply(
        &mut self,
        key: SettingKey,
        raw: &str,
        observers: &mut [&mut dyn SettingsObserver],
    ) -> Result<Option<SettingsChange>, LogkeepError> {
        let value = key.parse_value(raw)?;
        let change = self.set(key, value)?;

        if let Some(change) = &change {
            for observer in observers.iter_mut() {
                observer.settings_changed(change);
            }
        }

        Ok(change)
    }
}

/// Every setting that can be changed at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    LogsFolder,
    AllowBackups,
    ProgressiveEnable,
    BackupsPerFile,
    RetryAttempts,
}

impl SettingKey {
    /// All keys, in display order
    pub const ALL: [SettingKey; 5] = [
        SettingKey::LogsFolder,
        SettingKey::AllowBackups,
        SettingKey::ProgressiveEnable,
        SettingKey::BackupsPerFile,
        SettingKey::RetryAttempts,
    ];

    /// Name used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::LogsFolder => "logs-folder",
            SettingKey::AllowBackups => "allow-backups",
            SettingKey::ProgressiveEnable => "progressive-enable",
            SettingKey::BackupsPerFile => "backups-per-file",
            SettingKey::RetryAttempts => "retry-attempts",
        }
    }

    /// Short description shown next to the setting
    pub fn description(&self) -> &'static str {
        match self {
            SettingKey::LogsFolder => "Folder containing the log files",
            SettingKey::AllowBackups => "Allow log backups",
            SettingKey::ProgressiveEnable => {
                "Enable backups for newly detected log files"
            }
            SettingKey::BackupsPerFile => "Backups kept per file",
            SettingKey::RetryAttempts => "Attempts per file operation",
        }
    }

    /// Parse a raw command-line value for this key
    pub fn parse_value(&self, raw: &str) -> Result<SettingValue, LogkeepError> {
        let raw = raw.trim();
        match self {
            SettingKey::LogsFolder => {
                let path = match raw {
                    "" | "default" => None,
                    other => Some(PathBuf::from(other)),
                };
                Ok(SettingValue::Path(path))
            }
            SettingKey::AllowBackups | SettingKey::ProgressiveEnable => {
                parse_bool(raw).map(SettingValue::Bool).ok_or_else(|| {
                    LogkeepError::Validation(format!(
                        "{} expects true or false, got '{}'",
                        self, raw
                    ))
                })
            }
            SettingKey::BackupsPerFile | SettingKey::RetryAttempts => raw
                .parse::<u32>()
                .map(SettingValue::Count)
                .map_err(|_| {
                    LogkeepError::Validation(format!(
                        "{} expects a whole number, got '{}'",
                        self, raw
                    ))
                }),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = LogkeepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| LogkeepError::Config(format!("Unknown setting: {}", s)))
    }
}

/// Typed value of a setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Count(u32),
    Path(Option<PathBuf>),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(flag) => write!(f, "{}", flag),
            SettingValue::Count(count) => write!(f, "{}", count),
            SettingValue::Path(Some(path)) => write!(f, "{}", path.display()),
            SettingValue::Path(None) => f.write_str("(default)"),
        }
    }
}

/// Notification that one setting took a new value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChange {
    pub key: SettingKey,
    pub value: SettingValue,
}

/// Receives settings changes synchronously on the thread that made them
pub trait SettingsObserver {
    fn settings_changed(&mut self, change: &SettingsChange);
}
