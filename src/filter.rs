// src/filter.rs

//! Basename filters deciding which files in the monitored folder get backed up.

use std::fmt::Debug;

/// Predicate over a file's basename (no directory part).
///
/// Implementations must be pure: the same name always gives the same answer.
pub trait BasenameFilter: Send + Sync + Debug {
    fn should_monitor(&self, basename: &str) -> bool;
}

/// Back up everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl BasenameFilter for AcceptAll {
    fn should_monitor(&self, _basename: &str) -> bool {
        true
    }
}

/// Skips the game's own `.bak` rotation files and the Steam cloud sidecar.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameSaveFilter;

const STEAM_CLOUD_SIDECAR: &str = "steam_autocloud.vdf";

impl BasenameFilter for GameSaveFilter {
    fn should_monitor(&self, basename: &str) -> bool {
        let lower = basename.to_lowercase();
        !(lower.ends_with(".bak") || lower == STEAM_CLOUD_SIDECAR)
    }
}
