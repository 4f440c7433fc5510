// src/config/validate.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::loader::default_backup_folder;
use crate::config::model::{AppConfig, BackupSection, RawConfigFile};
use crate::errors::{Result, SavewatchError};
use crate::game;
use crate::types::BackupOptions;

impl TryFrom<RawConfigFile> for AppConfig {
    type Error = SavewatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let backup_options = validate_backup_section(&raw.backup)?;
        let folder_to_monitor = resolve_folder_to_monitor(&raw)?;
        let backup_folder =
            prepare_backup_folder(raw.backup_folder.unwrap_or_else(default_backup_folder))?;
        ensure_distinct(&folder_to_monitor, &backup_folder)?;

        Ok(AppConfig {
            folder_to_monitor,
            backup_folder,
            game: raw.game,
            backup_options,
            copy_all_files_at_start: raw.backup.copy_all_files_at_start,
        })
    }
}

fn config_error(msg: impl Into<String>) -> SavewatchError {
    SavewatchError::ConfigError(msg.into())
}

fn validate_backup_section(section: &BackupSection) -> Result<BackupOptions> {
    if section.min_backup_interval_sec < 1 {
        return Err(config_error(format!(
            "min_backup_interval_sec must be >= 1 (got {})",
            section.min_backup_interval_sec
        )));
    }
    if section.backup_depth_days < 2 {
        return Err(config_error(format!(
            "backup_depth_days must be >= 2 to avoid losing files on day change (got {})",
            section.backup_depth_days
        )));
    }
    if !(1..=24).contains(&section.cleanup_period_hours) {
        return Err(config_error(format!(
            "cleanup_period_hours must be between 1 and 24 (got {})",
            section.cleanup_period_hours
        )));
    }

    Ok(BackupOptions {
        min_update_interval_sec: section.min_backup_interval_sec,
        backup_depth_days: usize::try_from(section.backup_depth_days).unwrap_or(usize::MAX),
        cleanup_period_sec: section.cleanup_period_hours * 60 * 60,
    })
}

fn resolve_folder_to_monitor(raw: &RawConfigFile) -> Result<PathBuf> {
    let folder = match (raw.game, raw.folder_to_monitor.as_ref()) {
        (None, None) => {
            return Err(config_error(
                "you should specify one argument: --game or --folder-to-monitor",
            ));
        }
        (Some(_), Some(_)) => {
            return Err(config_error(
                "you should specify only one argument: --game or --folder-to-monitor",
            ));
        }
        (Some(game), None) => game::save_folder(game)?,
        (None, Some(folder)) => folder.clone(),
    };

    let folder = std::path::absolute(&folder)?;
    if !folder.is_dir() {
        return Err(config_error(format!("not a directory: {:?}", folder)));
    }
    Ok(folder)
}

fn prepare_backup_folder(folder: PathBuf) -> Result<PathBuf> {
    let folder = std::path::absolute(&folder)?;
    if folder.exists() {
        if !folder.is_dir() {
            return Err(config_error(format!(
                "backup folder is not a directory: {:?}",
                folder
            )));
        }
    } else {
        fs::create_dir_all(&folder).map_err(|e| {
            config_error(format!("unable to create backup folder {:?}: {e}", folder))
        })?;
    }
    Ok(folder)
}

fn ensure_distinct(folder_to_monitor: &Path, backup_folder: &Path) -> Result<()> {
    let monitored = fs::canonicalize(folder_to_monitor)?;
    let backups = fs::canonicalize(backup_folder)?;
    if monitored == backups {
        return Err(config_error(format!(
            "monitor and backup folder are the same: {:?}",
            monitored
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn raw(monitor: &Path, backups: &Path) -> RawConfigFile {
        RawConfigFile {
            folder_to_monitor: Some(monitor.to_path_buf()),
            backup_folder: Some(backups.to_path_buf()),
            ..RawConfigFile::default()
        }
    }

    fn expect_config_error(raw: RawConfigFile, needle: &str) {
        match AppConfig::try_from(raw) {
            Err(SavewatchError::ConfigError(msg)) => {
                assert!(msg.contains(needle), "message {msg:?} lacks {needle:?}")
            }
            Err(e) => panic!("Expected ConfigError, got: {:?}", e),
            Ok(cfg) => panic!("Expected error, got Ok({:?})", cfg),
        }
    }

    #[test]
    fn valid_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let monitor = dir.path().join("saves");
        fs::create_dir(&monitor).unwrap();
        let backups = dir.path().join("nested").join("backups");

        let cfg = AppConfig::try_from(raw(&monitor, &backups)).unwrap();

        assert!(backups.is_dir(), "backup folder is created");
        assert_eq!(cfg.folder_to_monitor, monitor);
        assert_eq!(cfg.backup_folder, backups);
        assert_eq!(cfg.backup_options, BackupOptions::default());
        assert!(cfg.copy_all_files_at_start);
        assert!(cfg.basename_filter().should_monitor("x.bak"));
    }

    #[test]
    fn needs_game_or_folder() {
        let dir = tempdir().unwrap();
        let mut cfg = raw(dir.path(), &dir.path().join("b"));
        cfg.folder_to_monitor = None;
        expect_config_error(cfg, "--game or --folder-to-monitor");
    }

    #[test]
    fn game_and_folder_are_exclusive() {
        let dir = tempdir().unwrap();
        let mut cfg = raw(dir.path(), &dir.path().join("b"));
        cfg.game = Some(crate::types::Game::Bl2);
        expect_config_error(cfg, "only one");
    }

    #[test]
    fn monitored_folder_must_exist() {
        let dir = tempdir().unwrap();
        expect_config_error(raw(&dir.path().join("missing"), &dir.path().join("b")), "not a directory");
    }

    #[test]
    fn backup_folder_must_not_be_a_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, b"x").unwrap();
        expect_config_error(raw(dir.path(), &file), "backup folder is not a directory");
    }

    #[test]
    fn folders_must_differ() {
        let dir = tempdir().unwrap();
        let same = dir.path().join("same");
        fs::create_dir(&same).unwrap();
        let alias = same.join("..").join("same");
        expect_config_error(raw(&same, &alias), "are the same");
    }

    #[test]
    fn option_ranges() {
        let dir = tempdir().unwrap();
        let base = raw(dir.path(), &dir.path().join("b"));

        let mut cfg = base.clone();
        cfg.backup.min_backup_interval_sec = 0;
        expect_config_error(cfg, "min_backup_interval_sec");

        let mut cfg = base.clone();
        cfg.backup.backup_depth_days = 1;
        expect_config_error(cfg, "backup_depth_days");

        let mut cfg = base.clone();
        cfg.backup.cleanup_period_hours = 0;
        expect_config_error(cfg, "cleanup_period_hours");

        let mut cfg = base;
        cfg.backup.cleanup_period_hours = 25;
        expect_config_error(cfg, "cleanup_period_hours");
    }

    #[test]
    fn cleanup_hours_become_seconds() {
        let dir = tempdir().unwrap();
        let mut cfg = raw(dir.path(), &dir.path().join("b"));
        cfg.backup.cleanup_period_hours = 2;
        cfg.backup.backup_depth_days = 3;
        cfg.backup.min_backup_interval_sec = 60;

        let cfg = AppConfig::try_from(cfg).unwrap();
        assert_eq!(
            cfg.backup_options,
            BackupOptions {
                min_update_interval_sec: 60,
                backup_depth_days: 3,
                cleanup_period_sec: 7200,
            }
        );
    }
}
