// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod filter;
pub mod fs;
pub mod game;
pub mod logging;
pub mod types;
pub mod watch;

use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::{load_and_validate, AppConfig};
use crate::engine::{BackupEngine, Runtime, RuntimeEvent};
use crate::errors::Result;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the backup engine (plus the initial backup-all pass)
/// - the file watcher
/// - Ctrl-C handling
/// - the runtime loop
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args)?;
    print_startup(&cfg);

    let mut engine = BackupEngine::new(
        cfg.folder_to_monitor.clone(),
        cfg.backup_folder.clone(),
        cfg.backup_options,
        cfg.basename_filter(),
    );

    let (rt_tx, mut rt_rx) = mpsc::unbounded_channel::<RuntimeEvent>();

    // Ctrl-C → graceful shutdown. Installed before the startup pass so an
    // interrupt there still lets the current file finish.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested);
        });
    }

    if cfg.copy_all_files_at_start {
        // Only the signal task can send before the watcher exists.
        let finished = tokio::task::block_in_place(|| {
            engine.backup_all_files_while(|| rt_rx.try_recv().is_err())
        });
        if !finished {
            info!("Stop.");
            return Ok(());
        }
    }

    let watcher = crate::watch::spawn_watcher(cfg.folder_to_monitor.clone(), rt_tx.clone())?;
    drop(rt_tx);

    let runtime = Runtime::new(engine, rt_rx);
    let result = runtime.run().await;

    // Stops the watcher thread.
    drop(watcher);
    info!("Stop.");

    result.map(|_| ())
}

fn print_startup(cfg: &AppConfig) {
    info!("start watching directory for updates: {:?}", cfg.folder_to_monitor);
    info!("file copies will be put under {:?}", cfg.backup_folder);
    if let Some(game) = cfg.game {
        info!(%game, "using save file filter for game");
    }
    info!(
        min_backup_interval_sec = cfg.backup_options.min_update_interval_sec,
        backup_depth_days = cfg.backup_options.backup_depth_days,
        cleanup_period_sec = cfg.backup_options.cleanup_period_sec,
        "backup options"
    );
}
