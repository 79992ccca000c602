//! Backup system for logkeep
//!
//! Keeps a rolling set of numbered copies of each log in a `Backup` folder
//! next to the logs.
//!
//! # Architecture
//!
//! - `path_format`: names of backup files
//! - `slots`: reading the backup folder and finding the slots of one log
//! - `retention`: shifting and evicting slots before a new backup
//! - `pending`: requests waiting for their log to become eligible
//! - `providers`: traits for the storage root, the observed logs and their
//!   current locations, plus the folder scanner implementing them
//! - `coordinator`: `BackupCoordinator`, which ties the above together
//!
//! # Backup Format
//!
//! Backups are plain copies named `<name>_bkp[<slot>]<extension>`, where slot
//! 1 is the newest. Files in the folder that don't follow this pattern are
//! left alone.
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
//!
//! let scanner = FolderScanner::new(vec![coordinator.storage_root()]);
//! coordinator.reconcile(&scanner, &scanner);
//! let report = coordinator.backup_candidates(&scanner, &scanner);
//! ```

pub mod coordinator;
pub mod path_format;
pub mod pending;
pub mod providers;
pub mod retention;
pub mod slots;

pub use coordinator::{BackupCoordinator, BackupStatus, PassReport};
pub use path_format::{backup_file_name, backup_path, BACKUP_FOLDER_NAME};
pub use pending::{BackupRequest, PendingQueue};
pub use providers::{CandidateProvider, FolderScanner, SourceResolver, StorageRoot};
pub use retention::{RetentionEngine, RetentionOp, RetentionOutcome, RetentionPolicy};
pub use slots::{scan, BackupListing, BackupSlot};
