//! Core data models for logkeep
//!
//! This module contains the data structures shared by the backup engine and
//! the reconciliation service.

pub mod entry;
pub mod ids;
pub mod lists;
pub mod log_file;

pub use entry::{BackupSnapshot, EntryChange, EntryRecord};
pub use ids::LogId;
pub use lists::EntryLists;
pub use log_file::LogFile;
