// tests/runtime_events.rs

use std::fs;
use std::time::Duration;

use savewatch::engine::{Clock, Runtime, RuntimeEvent};
use savewatch::watch::{spawn_watcher, FsNotification, NotificationKind};
use savewatch_test_utils::builders::EngineBuilder;
use savewatch_test_utils::fixtures::Folders;
use savewatch_test_utils::{init_tracing, with_timeout};
use tokio::sync::mpsc;

fn changed(folders: &Folders, basename: &str, kind: NotificationKind) -> RuntimeEvent {
    RuntimeEvent::FileChanged(FsNotification {
        kind,
        path: folders.monitored.join(basename),
        is_directory: false,
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn notifications_drive_the_engine_until_shutdown() {
    init_tracing();
    let folders = Folders::new();
    folders.write_save("1.sav", b"one");
    folders.write_save("2.sav", b"two");
    let (engine, clock) = EngineBuilder::new().build(&folders.monitored, &folders.backups);

    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(changed(&folders, "1.sav", NotificationKind::Created)).unwrap();
    tx.send(changed(&folders, "1.sav", NotificationKind::Modified)).unwrap();
    tx.send(changed(&folders, "2.sav", NotificationKind::Modified)).unwrap();
    tx.send(RuntimeEvent::FileChanged(FsNotification {
        kind: NotificationKind::Created,
        path: folders.monitored.join("subdir"),
        is_directory: true,
    }))
    .unwrap();
    tx.send(RuntimeEvent::ShutdownRequested).unwrap();

    let engine = with_timeout(Runtime::new(engine, rx).run()).await.unwrap();

    assert_eq!(folders.snapshots("1.sav"), vec!["1.sav.2024-05-10--12-00-00"]);
    assert_eq!(folders.snapshots("2.sav"), vec!["2.sav.2024-05-10--12-00-00"]);
    assert!(!folders.snapshot_dir("subdir").exists());
    assert_eq!(engine.record("1.sav").unwrap().last_copy_time, Some(clock.now()));
    assert!(engine.record("subdir").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn state_survives_between_notifications() {
    init_tracing();
    let folders = Folders::new();
    folders.write_save("save.dat", b"v1");
    let (engine, clock) = EngineBuilder::new().build(&folders.monitored, &folders.backups);

    let (tx, rx) = mpsc::unbounded_channel();
    let runtime = tokio::spawn(Runtime::new(engine, rx).run());

    tx.send(changed(&folders, "save.dat", NotificationKind::Modified)).unwrap();
    tx.send(changed(&folders, "save.dat", NotificationKind::Modified)).unwrap();
    tx.send(RuntimeEvent::ShutdownRequested).unwrap();
    let engine = with_timeout(runtime).await.unwrap().unwrap();

    // Second notification fell inside the debounce window.
    assert_eq!(folders.snapshots("save.dat").len(), 1);
    assert_eq!(
        engine.record("save.dat").unwrap().last_copy_time,
        Some(clock.now())
    );
}

/// Needs a working native watch backend (inotify, FSEvents, ...).
#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn real_watcher_reports_new_files() {
    init_tracing();
    let folders = Folders::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _watcher = spawn_watcher(folders.monitored.clone(), tx).unwrap();

    // Give the backend a moment to register the watch.
    tokio::time::sleep(Duration::from_millis(100)).await;
    fs::write(folders.monitored.join("fresh.sav"), b"new").unwrap();

    let event = with_timeout(rx.recv()).await.unwrap();
    match event {
        RuntimeEvent::FileChanged(n) => {
            assert_eq!(n.path.file_name().unwrap(), "fresh.sav");
            assert!(!n.is_directory);
        }
        other => panic!("Expected FileChanged, got: {:?}", other),
    }
}
