// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::CliArgs;
use crate::config::model::{AppConfig, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** look at the
/// filesystem paths it names. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Build the application config from the CLI arguments.
///
/// - Reads the TOML file given with `--config`, if any.
/// - Layers the CLI flags on top.
/// - Validates, resolving the game save folder and creating the backup
///   folder if needed.
pub fn load_and_validate(args: &CliArgs) -> Result<AppConfig> {
    let mut raw = match args.config {
        Some(ref path) => load_from_path(path)?,
        None => RawConfigFile::default(),
    };
    raw.apply_cli(args);
    AppConfig::try_from(raw)
}

/// Backup folder used when none is configured: `backup_files` next to the
/// executable, or in the current directory if that cannot be determined.
pub fn default_backup_folder() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("backup_files")
}
