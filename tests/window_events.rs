#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

use tauri::test::{mock_app, MockRuntime};
use tauri::{AppHandle, Emitter, Manager};
use tempfile::TempDir;
use todo_desk_lib::{db, ipc};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
struct TestWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Handlers run on runtime threads, so the capture has to be the global default.
fn captured_logs() -> Arc<Mutex<Vec<u8>>> {
    static LOGS: OnceLock<Arc<Mutex<Vec<u8>>>> = OnceLock::new();
    LOGS.get_or_init(|| {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let writer = buf.clone();
        fmt()
            .with_env_filter(EnvFilter::new("todo_desk=info"))
            .with_writer(move || TestWriter(writer.clone()))
            .json()
            .init();
        buf
    })
    .clone()
}

fn log_lines_with(needle: &str) -> usize {
    let logs = captured_logs();
    let text = String::from_utf8(logs.lock().unwrap().clone()).unwrap();
    text.lines().filter(|line| line.contains(needle)).count()
}

fn wait_until(mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    check()
}

fn item_windows(handle: &AppHandle<MockRuntime>) -> Vec<String> {
    handle
        .webview_windows()
        .into_keys()
        .filter(|label| label.starts_with("item-"))
        .collect()
}

#[test]
fn window_events_open_focus_and_close_item_windows() {
    captured_logs();
    let dir: TempDir = tempfile::tempdir().expect("tempdir");
    let pool = tauri::async_runtime::block_on(db::open_sqlite_pool(&dir.path().join("todo.db")))
        .expect("open pool");
    let app = mock_app();
    let handle = app.handle().clone();
    ipc::register(&handle, pool);

    handle.emit("openItemWindow", 3).unwrap();
    assert!(
        wait_until(|| handle.get_webview_window("item-3").is_some()),
        "item-3 never opened"
    );

    handle.emit("openItemWindow", "3").unwrap();
    assert!(
        wait_until(|| log_lines_with("\"event\":\"item_window_focused\"") >= 1),
        "second open did not focus the existing window"
    );
    assert_eq!(item_windows(&handle), vec!["item-3".to_string()]);

    // Closing is a request to the event loop; the handler logs once it is sent.
    handle.emit("close-window", "item-3").unwrap();
    assert!(
        wait_until(|| {
            let logs = captured_logs();
            let text = String::from_utf8(logs.lock().unwrap().clone()).unwrap();
            text.lines().any(|line| {
                line.contains("\"event\":\"window_closed\"") && line.contains("\"label\":\"item-3\"")
            })
        }),
        "close-window did not reach item-3"
    );
    assert_eq!(log_lines_with("\"event\":\"event_handler_failed\""), 0);
}
