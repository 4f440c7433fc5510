// src/game.rs

//! Save-folder autodiscovery for the supported games.
//!
//! Each game keeps its saves under a per-user profiles folder containing one
//! sub-folder named after the numeric platform account id. We monitor that
//! sub-folder, and refuse to guess when there is more than one.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{Result, SavewatchError};
use crate::filter::{BasenameFilter, GameSaveFilter};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::Game;

/// Host platforms with a known save layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Profiles folder of `game` under `home`, if the game is supported there.
///
/// BL2 is only known in its macOS layout, BL3 only on Windows.
pub fn profiles_folder(game: Game, platform: Platform, home: &Path) -> Option<PathBuf> {
    match (game, platform) {
        (Game::Bl2, Platform::Unix) => Some(
            home.join("Library")
                .join("Application Support")
                .join("Borderlands 2")
                .join("WillowGame")
                .join("SaveData"),
        ),
        (Game::Bl3, Platform::Windows) => Some(
            home.join("Documents")
                .join("My Games")
                .join("Borderlands 3")
                .join("Saved")
                .join("SaveGames"),
        ),
        _ => None,
    }
}

/// The single all-digits sub-folder of `profiles`.
pub fn single_digits_sub_folder<F: FileSystem + ?Sized>(fs: &F, profiles: &Path) -> Result<PathBuf> {
    if !fs.is_dir(profiles) {
        return Err(SavewatchError::GameFolder(format!(
            "save folder not found: {:?}",
            profiles
        )));
    }

    let mut digits_folders: Vec<PathBuf> = fs
        .read_dir(profiles)?
        .into_iter()
        .filter(|path| fs.is_dir(path))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()))
        })
        .collect();
    digits_folders.sort();

    match digits_folders.len() {
        0 => Err(SavewatchError::GameFolder(format!(
            "there are no folders made of digits in {:?}",
            profiles
        ))),
        1 => Ok(digits_folders.remove(0)),
        n => {
            let names: Vec<String> = digits_folders
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect();
            Err(SavewatchError::GameFolder(format!(
                "there are many ({n}) folders made of digits in {:?}: {:?}. \
                 Please use --folder-to-monitor to specify the directory to monitor.",
                profiles, names
            )))
        }
    }
}

/// Locate the save folder of `game` on `platform` for the user at `home`.
pub fn discover_save_folder<F: FileSystem + ?Sized>(
    fs: &F,
    game: Game,
    platform: Platform,
    home: &Path,
) -> Result<PathBuf> {
    let profiles = profiles_folder(game, platform, home).ok_or_else(|| {
        SavewatchError::GameFolder(format!(
            "{game} save folder autodiscovery not supported on platform {platform:?} yet"
        ))
    })?;
    debug!(%game, ?profiles, "looking for save folder");
    single_digits_sub_folder(fs, &profiles)
}

/// [`discover_save_folder`] for the current user on this machine.
pub fn save_folder(game: Game) -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        SavewatchError::GameFolder("unable to determine the user's home directory".to_string())
    })?;
    discover_save_folder(&RealFileSystem, game, Platform::current(), &home)
}

/// Filter to use for the files of `game`.
pub fn filter_for(game: Option<Game>) -> Box<dyn BasenameFilter> {
    match game {
        Some(_) => Box::new(GameSaveFilter),
        None => Box::new(crate::filter::AcceptAll),
    }
}
