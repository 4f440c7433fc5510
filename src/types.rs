use std::fmt;

use chrono::TimeDelta;
use serde::Deserialize;

/// Immutable knobs for the backup engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackupOptions {
    /// Minimum time between two copies of the same file.
    pub min_update_interval_sec: u64,
    /// Number of most recent calendar days whose snapshots are kept.
    ///
    /// Never less than 2, otherwise the day rollover at midnight would wipe
    /// every copy taken earlier that evening.
    pub backup_depth_days: usize,
    /// Minimum time between two retention sweeps of the same file.
    pub cleanup_period_sec: u64,
}

impl BackupOptions {
    pub fn min_update_interval(&self) -> TimeDelta {
        seconds(self.min_update_interval_sec)
    }

    pub fn cleanup_period(&self) -> TimeDelta {
        seconds(self.cleanup_period_sec)
    }
}

impl Default for BackupOptions {
    fn default() -> Self {
        BackupOptions {
            min_update_interval_sec: 10,
            backup_depth_days: 7,
            cleanup_period_sec: 8 * 60 * 60,
        }
    }
}

/// Saturating conversion, so absurd config values cannot overflow `TimeDelta`.
pub(crate) fn seconds(secs: u64) -> TimeDelta {
    let secs = i64::try_from(secs).unwrap_or(i64::MAX);
    TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX)
}

/// Games whose save folder can be discovered automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    /// Borderlands 2.
    Bl2,
    /// Borderlands 3.
    Bl3,
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Game::Bl2 => write!(f, "BL2"),
            Game::Bl3 => write!(f, "BL3"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn huge_intervals_saturate() {
        assert_eq!(seconds(u64::MAX), TimeDelta::MAX);
        assert_eq!(seconds(90), TimeDelta::seconds(90));
    }
}
