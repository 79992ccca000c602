//! logkeep - rolling numbered backups of log files
//!
//! This library keeps a bounded set of numbered copies of each log file in a
//! `Backup` folder next to the logs. Slot 1 always holds the newest copy;
//! older copies shift up a slot on every backup and the oldest falls off once
//! the configured cap is reached. Which logs are backed up is decided by a
//! persisted allow list and deny list, optionally enabling newly seen logs
//! automatically.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration, settings and path management
//! - `error`: Custom error types
//! - `models`: Log identities, snapshot entries and the enabled/disabled lists
//! - `storage`: File I/O with retries and the list files
//! - `services`: Reconciliation of observed logs with the lists
//! - `backup`: Slot discovery, retention and the backup coordinator
//! - `display`: Plain-text tables for the command line
//! - `cli`: Command handlers
//! - `logging`: Tracing setup
//!
//! # Example
//!
//! ```rust,ignore
//! use logkeep::backup::{BackupCoordinator, FolderScanner};
//! use logkeep::config::{LogkeepPaths, Settings};
//!
//! let paths = LogkeepPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut coordinator = BackupCoordinator::from_settings(&settings, &paths)?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LogkeepError, LogkeepResult};
