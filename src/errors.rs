// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Only startup can fail: configuration, game folder discovery and wiring up
//! the watcher. Per-file backup problems never surface here; the engine logs
//! them and keeps going.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SavewatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Save folder discovery failed: {0}")]
    GameFolder(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("File watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SavewatchError>;
