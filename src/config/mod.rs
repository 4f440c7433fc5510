// src/config/mod.rs

//! Configuration loading and validation for savewatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and merge CLI flags (`loader.rs`).
//! - Validate paths and option ranges (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_backup_folder, load_and_validate, load_from_path};
pub use model::{AppConfig, BackupSection, RawConfigFile};
