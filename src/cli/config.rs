//! Configuration CLI commands
//!
//! Shows and changes settings, and initializes the configuration folder.

use std::str::FromStr;

use clap::Subcommand;

use crate::backup::BackupCoordinator;
use crate::config::{LogkeepPaths, SettingKey, Settings, SettingsObserver};
use crate::error::LogkeepResult;
use crate::storage::ListStore;

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show paths and current settings
    Show,

    /// Change a setting
    Set {
        /// Setting name, e.g. backups-per-file
        key: String,
        /// New value ('default' resets logs-folder)
        value: String,
    },
}

/// Handle a config command
pub fn handle_config_command(
    paths: &LogkeepPaths,
    settings: &mut Settings,
    cmd: ConfigCommands,
) -> LogkeepResult<()> {
    match cmd {
        ConfigCommands::Show => {
            println!("logkeep Configuration");
            println!("=====================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Allow list:       {}", paths.allow_list_file().display());
            println!("Deny list:        {}", paths.deny_list_file().display());
            println!("Logs folder:      {}", settings.storage_root(paths).display());
            println!();
            println!("Settings:");

            let width = SettingKey::ALL
                .iter()
                .map(|key| key.as_str().len())
                .max()
                .unwrap_or(0);
            for key in SettingKey::ALL {
                println!(
                    "  {:<width$}  {:<12}  {}",
                    key.as_str(),
                    settings.get(key).to_string(),
                    key.description(),
                    width = width,
                );
            }
        }

        ConfigCommands::Set { key, value } => {
            let key = SettingKey::from_str(&key)?;
            let mut coordinator = BackupCoordinator::from_settings(settings, paths)?;
            let observers: &mut [&mut dyn SettingsObserver] = &mut [&mut coordinator];

            match settings.apply(key, &value, observers)? {
                Some(change) => {
                    settings.save(paths)?;
                    println!("Set {} = {}", change.key, change.value);
                    if let Some(effect) = describe_effect(key, &coordinator) {
                        println!("{}", effect);
                    }
                }
                None => println!("{} is already {}", key, settings.get(key)),
            }
        }
    }

    Ok(())
}

/// What a changed setting means for backups, read back from `coordinator`
fn describe_effect(key: SettingKey, coordinator: &BackupCoordinator) -> Option<String> {
    match key {
        SettingKey::LogsFolder => Some(format!(
            "Backups will be stored in: {}",
            coordinator.backup_dir().display()
        )),
        SettingKey::AllowBackups => Some(if coordinator.backups_allowed() {
            "Backups are enabled.".to_string()
        } else {
            "Backups are disabled.".to_string()
        }),
        SettingKey::BackupsPerFile => Some(format!(
            "Keeping up to {} backup(s) per log.",
            coordinator.policy().max_slots
        )),
        SettingKey::ProgressiveEnable | SettingKey::RetryAttempts => None,
    }
}

/// Create the configuration folder, settings file and lists
pub fn handle_init_command(paths: &LogkeepPaths, settings: &Settings) -> LogkeepResult<()> {
    println!("Initializing logkeep at: {}", paths.base_dir().display());

    paths.ensure_directories()?;
    settings.save(paths)?;

    let store = ListStore::new(paths.allow_list_file(), paths.deny_list_file());
    let lists = store.load()?;
    store.save(&lists)?;

    let logs_dir = settings.storage_root(paths);
    if settings.logs_folder.is_none() {
        std::fs::create_dir_all(&logs_dir)?;
    }

    println!("Initialization complete!");
    println!();
    println!("Logs folder: {}", logs_dir.display());
    println!("Backups are {}.", if settings.allow_backups { "enabled" } else { "disabled" });
    println!("Run 'logkeep config set allow-backups true' to turn them on.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_notifies_coordinator() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogkeepPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::default();
        let mut coordinator = BackupCoordinator::from_settings(&settings, &paths).unwrap();

        let logs = temp_dir.path().join("elsewhere");
        let raw = logs.to_string_lossy().to_string();
        {
            let observers: &mut [&mut dyn SettingsObserver] = &mut [&mut coordinator];
            settings.apply(SettingKey::LogsFolder, &raw, observers).unwrap();
            settings.apply(SettingKey::BackupsPerFile, "4", observers).unwrap();
        }

        assert_eq!(coordinator.backup_dir(), logs.join("Backup"));
        assert_eq!(
            describe_effect(SettingKey::LogsFolder, &coordinator),
            Some(format!("Backups will be stored in: {}", logs.join("Backup").display()))
        );
        assert_eq!(
            describe_effect(SettingKey::BackupsPerFile, &coordinator),
            Some("Keeping up to 4 backup(s) per log.".to_string())
        );
        assert_eq!(describe_effect(SettingKey::RetryAttempts, &coordinator), None);
    }
}
