// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::cli::CliArgs;
use crate::filter::BasenameFilter;
use crate::game::filter_for;
use crate::types::{BackupOptions, Game};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// folder_to_monitor = "/home/me/saves"   # or: game = "bl2"
/// backup_folder = "/home/me/save-backups"
///
/// [backup]
/// min_backup_interval_sec = 10
/// backup_depth_days = 7
/// cleanup_period_hours = 8
/// copy_all_files_at_start = true
/// ```
///
/// All keys are optional; CLI flags are layered on top with
/// [`RawConfigFile::apply_cli`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    pub folder_to_monitor: Option<PathBuf>,
    pub backup_folder: Option<PathBuf>,
    pub game: Option<Game>,
    #[serde(default)]
    pub backup: BackupSection,
}

/// `[backup]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackupSection {
    pub min_backup_interval_sec: u64,
    pub backup_depth_days: u64,
    pub cleanup_period_hours: u64,
    pub copy_all_files_at_start: bool,
}

impl Default for BackupSection {
    fn default() -> Self {
        Self {
            min_backup_interval_sec: 10,
            backup_depth_days: 7,
            cleanup_period_hours: 8,
            copy_all_files_at_start: true,
        }
    }
}

impl RawConfigFile {
    /// Override file values with whatever was given on the command line.
    pub fn apply_cli(&mut self, args: &CliArgs) {
        if let Some(ref folder) = args.folder_to_monitor {
            self.folder_to_monitor = Some(folder.clone());
        }
        if let Some(ref folder) = args.backup_folder {
            self.backup_folder = Some(folder.clone());
        }
        if let Some(game) = args.game {
            self.game = Some(game);
        }
        if let Some(secs) = args.min_backup_interval_sec {
            self.backup.min_backup_interval_sec = secs;
        }
        if let Some(days) = args.backup_depth_days {
            self.backup.backup_depth_days = days;
        }
        if let Some(hours) = args.cleanup_period_hours {
            self.backup.cleanup_period_hours = hours;
        }
        if args.skip_copy_all_files_at_start {
            self.backup.copy_all_files_at_start = false;
        }
    }
}

/// Validated application config. Both folders exist, are absolute and
/// distinct.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub folder_to_monitor: PathBuf,
    pub backup_folder: PathBuf,
    pub game: Option<Game>,
    pub backup_options: BackupOptions,
    pub copy_all_files_at_start: bool,
}

impl AppConfig {
    pub fn basename_filter(&self) -> Box<dyn BasenameFilter> {
        filter_for(self.game)
    }
}
