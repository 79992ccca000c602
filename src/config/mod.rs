//! Configuration module for logkeep
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Typed setting keys and change notification

pub mod paths;
pub mod settings;

pub use paths::LogkeepPaths;
pub use settings::{
    FolderOrder, SettingKey, SettingValue, Settings, SettingsChange, SettingsObserver,
};
