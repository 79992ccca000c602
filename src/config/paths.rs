//! Path management for logkeep
//!
//! Provides XDG-compliant path resolution for configuration, the persisted
//! allow/deny lists and the default logs folder.
//!
//! ## Path Resolution Order
//!
//! 1. `LOGKEEP_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/logkeep` or `~/.config/logkeep`
//! 3. Windows: `%APPDATA%\logkeep`

use std::path::PathBuf;

use crate::error::LogkeepError;

/// File holding identities with backups enabled
pub const ALLOW_LIST_FILE: &str = "backup-whitelist.txt";

/// File holding identities with backups disabled
pub const DENY_LIST_FILE: &str = "backup-blacklist.txt";

/// Manages all paths used by logkeep
#[derive(Debug, Clone)]
pub struct LogkeepPaths {
    /// Base directory for all logkeep data
    base_dir: PathBuf,
}

impl LogkeepPaths {
    /// Create a new LogkeepPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, LogkeepError> {
        let base_dir = if let Ok(custom) = std::env::var("LOGKEEP_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create LogkeepPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/logkeep/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the allow list
    pub fn allow_list_file(&self) -> PathBuf {
        self.base_dir.join(ALLOW_LIST_FILE)
    }

    /// Get the path to the deny list
    pub fn deny_list_file(&self) -> PathBuf {
        self.base_dir.join(DENY_LIST_FILE)
    }

    /// Get the logs folder used when settings don't name one
    pub fn default_logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), LogkeepError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LogkeepError::Io(format!("Failed to create base directory: {}", e)))?;

        Ok(())
    }

    /// Check if logkeep has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, LogkeepError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                LogkeepError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("logkeep"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, LogkeepError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| LogkeepError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("logkeep"))
}
