// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every option here can also come from the TOML file given with `--config`;
//! flags given on the command line win.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::Game;

/// Command-line arguments for `savewatch`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "savewatch",
    version,
    about = "Keep dated backup copies of files in a folder as they change.",
    long_about = None
)]
pub struct CliArgs {
    /// Optional TOML config file with the same settings as the flags below.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Autodiscover the save folder of this game instead of
    /// `--folder-to-monitor`.
    #[arg(long, value_enum, ignore_case = true, conflicts_with = "folder_to_monitor")]
    pub game: Option<Game>,

    /// Folder whose files are backed up (not recursive).
    #[arg(long, value_name = "DIR")]
    pub folder_to_monitor: Option<PathBuf>,

    /// Directory to save backups into.
    ///
    /// Default: `backup_files` next to the executable.
    #[arg(long, value_name = "DIR")]
    pub backup_folder: Option<PathBuf>,

    /// Minimum time between making backup copies of the same file.
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub min_backup_interval_sec: Option<u64>,

    /// How many days to keep backups of. 2 is the minimum, to avoid losing
    /// files on day change.
    #[arg(long, value_name = "DAYS", value_parser = clap::value_parser!(u64).range(2..))]
    pub backup_depth_days: Option<u64>,

    /// Period between cleanups of older backup copies. Cleanup runs
    /// separately for each file on a new backup event.
    #[arg(long, value_name = "HOURS", value_parser = clap::value_parser!(u64).range(1..=24))]
    pub cleanup_period_hours: Option<u64>,

    /// Do not copy every file of the monitored folder at startup.
    #[arg(long)]
    pub skip_copy_all_files_at_start: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SAVEWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
