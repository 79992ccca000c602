use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn logkeep(data_dir: &Path) -> Result<Command> {
    let mut cmd = Command::cargo_bin("logkeep")?;
    cmd.env("LOGKEEP_DATA_DIR", data_dir);
    cmd.env_remove("RUST_LOG");
    Ok(cmd)
}

fn init_with_backups(data_dir: &Path) -> Result<()> {
    logkeep(data_dir)?.arg("init").assert().success();
    logkeep(data_dir)?
        .args(["config", "set", "allow-backups", "true"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set allow-backups = true"));
    Ok(())
}

#[test]
fn init_creates_configuration() -> Result<()> {
    let temp_dir = TempDir::new()?;

    logkeep(temp_dir.path())?
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(temp_dir.path().join("config.json").exists());
    assert!(temp_dir.path().join("backup-whitelist.txt").exists());
    assert!(temp_dir.path().join("backup-blacklist.txt").exists());
    assert!(temp_dir.path().join("logs").is_dir());
    Ok(())
}

#[test]
fn run_reports_disabled_backups() -> Result<()> {
    let temp_dir = TempDir::new()?;
    logkeep(temp_dir.path())?.arg("init").assert().success();
    fs::write(temp_dir.path().join("logs").join("console.log"), "hello")?;

    logkeep(temp_dir.path())?
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backups are disabled."));

    assert!(!temp_dir.path().join("logs").join("Backup").exists());
    Ok(())
}

#[test]
fn run_rotates_backups_within_cap() -> Result<()> {
    let temp_dir = TempDir::new()?;
    init_with_backups(temp_dir.path())?;
    let logs = temp_dir.path().join("logs");
    fs::write(logs.join("mods.log"), "mods")?;

    for content in ["A", "B", "C"] {
        fs::write(logs.join("console.log"), content)?;
        logkeep(temp_dir.path())?
            .arg("run")
            .assert()
            .success()
            .stdout(predicate::str::contains("Backed up 2 log(s)"));
    }

    let backup = logs.join("Backup");
    assert_eq!(fs::read_to_string(backup.join("console_bkp[1].log"))?, "C");
    assert_eq!(fs::read_to_string(backup.join("console_bkp[2].log"))?, "B");
    assert!(!backup.join("console_bkp[3].log").exists());

    logkeep(temp_dir.path())?
        .args(["slots", "console"])
        .assert()
        .success()
        .stdout(predicate::str::contains("console_bkp[2].log"))
        .stdout(predicate::str::contains("Total: 2 of 2 slot(s)"));
    Ok(())
}

#[test]
fn disable_moves_log_to_deny_list() -> Result<()> {
    let temp_dir = TempDir::new()?;
    init_with_backups(temp_dir.path())?;
    let logs = temp_dir.path().join("logs");
    fs::write(logs.join("console.log"), "c")?;
    fs::write(logs.join("mods.log"), "m")?;

    logkeep(temp_dir.path())?
        .args(["disable", "mods"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Disabled backups for mods"));

    let deny = fs::read_to_string(temp_dir.path().join("backup-blacklist.txt"))?;
    let allow = fs::read_to_string(temp_dir.path().join("backup-whitelist.txt"))?;
    assert!(deny.lines().any(|line| line == "mods"));
    assert!(!allow.lines().any(|line| line == "mods"));

    logkeep(temp_dir.path())?
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"mods\s+off")?);

    logkeep(temp_dir.path())?
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backed up 1 log(s) (1 disabled)"));
    assert!(!logs.join("Backup").join("mods_bkp[1].log").exists());
    Ok(())
}

#[test]
fn config_set_rejects_out_of_range_cap() -> Result<()> {
    let temp_dir = TempDir::new()?;

    logkeep(temp_dir.path())?
        .args(["config", "set", "backups-per-file", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 5"));

    logkeep(temp_dir.path())?
        .args(["config", "set", "backups_per_file", "3"])
        .assert()
        .success();

    logkeep(temp_dir.path())?
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"backups-per-file\s+3")?);
    Ok(())
}

#[test]
fn config_set_logs_folder_reports_backup_location() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let logs = temp_dir.path().join("game-logs");
    let expected = format!("Backups will be stored in: {}", logs.join("Backup").display());

    logkeep(temp_dir.path())?
        .args(["config", "set", "logs-folder"])
        .arg(&logs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Set logs-folder"))
        .stdout(predicate::str::contains(expected));
    Ok(())
}

#[test]
fn slots_rejects_path_like_names() -> Result<()> {
    let temp_dir = TempDir::new()?;

    logkeep(temp_dir.path())?
        .args(["slots", "../console"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
    Ok(())
}

#[test]
fn purge_requires_force() -> Result<()> {
    let temp_dir = TempDir::new()?;
    init_with_backups(temp_dir.path())?;
    let logs = temp_dir.path().join("logs");
    fs::write(logs.join("console.log"), "c")?;
    logkeep(temp_dir.path())?.arg("run").assert().success();

    logkeep(temp_dir.path())?
        .arg("purge")
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    assert!(logs.join("Backup").join("console_bkp[1].log").exists());

    logkeep(temp_dir.path())?
        .args(["purge", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 file(s)"));
    assert!(!logs.join("Backup").join("console_bkp[1].log").exists());
    assert!(logs.join("Backup").is_dir());
    Ok(())
}
