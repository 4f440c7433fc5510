#![allow(dead_code)]

use std::path::Path;

use savewatch::engine::{BackupEngine, ManualClock};
use savewatch::filter::{AcceptAll, BasenameFilter};
use savewatch::fs::RealFileSystem;
use savewatch::types::BackupOptions;

/// Builder for `BackupOptions` to simplify test setup.
pub struct BackupOptionsBuilder {
    options: BackupOptions,
}

impl BackupOptionsBuilder {
    pub fn new() -> Self {
        Self {
            options: BackupOptions {
                min_update_interval_sec: 10,
                backup_depth_days: 2,
                cleanup_period_sec: 60,
            },
        }
    }

    pub fn min_update_interval_sec(mut self, secs: u64) -> Self {
        self.options.min_update_interval_sec = secs;
        self
    }

    pub fn backup_depth_days(mut self, days: usize) -> Self {
        self.options.backup_depth_days = days;
        self
    }

    pub fn cleanup_period_sec(mut self, secs: u64) -> Self {
        self.options.cleanup_period_sec = secs;
        self
    }

    pub fn build(self) -> BackupOptions {
        self.options
    }
}

impl Default for BackupOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for an engine on the real filesystem driven by a [`ManualClock`].
pub struct EngineBuilder {
    options: BackupOptions,
    filter: Box<dyn BasenameFilter>,
    clock: ManualClock,
}

impl EngineBuilder {
    /// Clock starts at noon on 2024-05-10, local time.
    pub fn new() -> Self {
        Self {
            options: BackupOptionsBuilder::new().build(),
            filter: Box::new(AcceptAll),
            clock: ManualClock::at_noon(2024, 5, 10).expect("noon exists on 2024-05-10"),
        }
    }

    pub fn options(mut self, options: BackupOptions) -> Self {
        self.options = options;
        self
    }

    pub fn filter(mut self, filter: Box<dyn BasenameFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn clock(mut self, clock: ManualClock) -> Self {
        self.clock = clock;
        self
    }

    /// Build the engine; the returned clock shares time with the engine's.
    pub fn build(
        self,
        folder_to_monitor: &Path,
        backup_folder: &Path,
    ) -> (BackupEngine<RealFileSystem, ManualClock>, ManualClock) {
        let engine = BackupEngine::with_parts(
            folder_to_monitor,
            backup_folder,
            self.options,
            self.filter,
            RealFileSystem,
            self.clock.clone(),
        );
        (engine, self.clock)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
