#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use todo_desk_lib::ipc::Inbound;
use todo_desk_lib::AppError;
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

#[test]
fn decode_failure_is_logged_with_code_and_event() {
    let buf = Arc::new(Mutex::new(Vec::<u8>::new()));
    let writer = buf.clone();
    let _ = fmt()
        .with_env_filter(EnvFilter::new("todo_desk=trace"))
        .with_writer(move || TestWriter(writer.clone()))
        .json()
        .try_init();

    let err: AppError = Inbound::decode("deleteTodo", "{\"id\": 1}")
        .unwrap_err()
        .into();
    err.log_with_event("event_handler_failed");

    let logs = String::from_utf8(buf.lock().unwrap().clone()).unwrap();
    assert!(logs.contains("\"event\":\"event_handler_failed\""), "{logs}");
    assert!(logs.contains("\"code\":\"IPC/DECODE\""), "{logs}");
    assert!(logs.contains("deleteTodo"), "{logs}");
}
