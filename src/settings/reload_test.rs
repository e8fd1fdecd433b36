use super::*;
use crate::settings::SETTINGS_FILE_NAME;
use std::sync::mpsc;
use std::thread::{self, ThreadId};
use tempfile::TempDir;

// The current-thread runtime polls every task on the test thread, so a listener that ran inside
// the reload task itself would report this thread's id.
#[tokio::test]
async fn change_listeners_run_off_the_runtime_thread() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(SETTINGS_FILE_NAME);
    let store = Arc::new(SettingsStore::new(path.clone()));
    store.load().expect("load should succeed");

    let (tx, rx) = mpsc::channel::<ThreadId>();
    let tx = parking_lot::Mutex::new(tx);
    store.on_change(move |_| {
        let _ = tx.lock().send(thread::current().id());
    });

    let task = spawn_reload_task(&Handle::current(), store.clone(), Duration::from_millis(10));

    // Another process writes the file
    SettingsStore::new(path)
        .set_enabled(false)
        .expect("set should succeed");

    let listener_thread =
        tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .expect("join")
            .expect("listener should fire");
    task.abort();

    assert_ne!(listener_thread, thread::current().id());
    assert!(!store.settings().enabled);
}

#[tokio::test]
async fn reload_errors_keep_the_task_running() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(SETTINGS_FILE_NAME);
    std::fs::write(&path, "not json").expect("write corrupt file");
    let store = Arc::new(SettingsStore::new(path.clone()));

    let task = spawn_reload_task(&Handle::current(), store.clone(), Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!task.is_finished());

    std::fs::write(&path, r#"{"soundEnabled": false}"#).expect("write valid file");
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while store.settings().sound_enabled && std::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    task.abort();

    assert!(!store.settings().sound_enabled);
}
