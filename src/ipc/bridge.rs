//! Wiring between frontend events and the todo commands.
//!
//! Each inbound event is decoded into an [`Inbound`] request, run against the
//! pool on the async runtime, and answered by emitting zero or more
//! [`Outbound`] events. A failing request is logged and answered with nothing.

use sqlx::SqlitePool;
use tauri::{AppHandle, Emitter, Listener, Runtime};
use tracing::{debug, info};

use super::events::{Inbound, Outbound, INBOUND_EVENTS};
use crate::util::dispatch_async_app_result;
use crate::{commands, windows, AppError, AppResult};

pub const EMIT_CODE: &str = "IPC/EMIT";

/// Destination for outbound events.
pub trait EventSink: Send + Sync + 'static {
    #[allow(clippy::result_large_err)]
    fn deliver(&self, outbound: &Outbound) -> AppResult<()>;
}

impl<R: Runtime> EventSink for AppHandle<R> {
    fn deliver(&self, outbound: &Outbound) -> AppResult<()> {
        self.emit(outbound.name(), outbound.payload()).map_err(|err| {
            AppError::new(EMIT_CODE, err.to_string()).with_context("event", outbound.name())
        })
    }
}

/// Emit `outbound` in order, stopping at the first failure.
#[allow(clippy::result_large_err)]
pub fn deliver_all<S: EventSink + ?Sized>(sink: &S, outbound: &[Outbound]) -> AppResult<()> {
    for event in outbound {
        sink.deliver(event)?;
        debug!(target: "todo_desk", event = "event_emitted", name = event.name());
    }
    Ok(())
}

/// Run a todo request and build the events that answer it.
///
/// Window requests have no todo semantics and are rejected here.
pub async fn handle_todo_request(pool: &SqlitePool, request: Inbound) -> AppResult<Vec<Outbound>> {
    let outbound = match request {
        Inbound::RequestTodos => vec![Outbound::todos(&commands::list_todos(pool).await?)?],
        Inbound::CreateTodo(new) => vec![
            Outbound::todos(&commands::create_todo(pool, new).await?)?,
            Outbound::FeedbackCreated,
        ],
        Inbound::DeleteTodo(id) => vec![Outbound::todos(&commands::delete_todo(pool, id).await?)?],
        Inbound::RequestSingleItem(id) => {
            vec![Outbound::single_item(&commands::get_todo(pool, id).await?)?]
        }
        Inbound::ToggleTodoCompleted(id) => {
            vec![Outbound::todos(&commands::toggle_todo(pool, id).await?)?]
        }
        Inbound::EditDescription { id, description } => vec![
            Outbound::single_item(&commands::edit_description(pool, id, &description).await?)?,
            Outbound::FeedbackSaved(id),
        ],
        other @ (Inbound::OpenItemWindow(_) | Inbound::CloseWindow { .. }) => {
            return Err(AppError::new(
                AppError::GENERIC_CODE,
                format!("`{}` is not a todo request", other.name()),
            ));
        }
    };
    Ok(outbound)
}

/// Decode and run one inbound event. Panics inside the handler come back as
/// `RUNTIME/PANIC` errors.
pub async fn handle_event<R: Runtime>(
    app: &AppHandle<R>,
    pool: &SqlitePool,
    name: &str,
    payload: &str,
) -> AppResult<()> {
    dispatch_async_app_result(|| async {
        let request = Inbound::decode(name, payload)?;
        debug!(target: "todo_desk", event = "event_received", name);
        match request {
            Inbound::OpenItemWindow(id) => windows::open_item_window(app, id),
            Inbound::CloseWindow { label } => windows::close_window(app, label.as_deref()),
            todo => {
                let outbound = handle_todo_request(pool, todo).await?;
                deliver_all(app, &outbound)
            }
        }
    })
    .await
    .map_err(|err| err.with_context("event", name))
}

/// Listen for every inbound event on `app`.
pub fn register<R: Runtime>(app: &AppHandle<R>, pool: SqlitePool) {
    for &name in INBOUND_EVENTS {
        let handle = app.clone();
        let pool = pool.clone();
        app.listen_any(name, move |event| {
            let payload = event.payload().to_string();
            let handle = handle.clone();
            let pool = pool.clone();
            tauri::async_runtime::spawn(async move {
                if let Err(err) = handle_event(&handle, &pool, name, &payload).await {
                    err.log_with_event("event_handler_failed");
                }
            });
        });
    }
    info!(target: "todo_desk", event = "listeners_registered", count = INBOUND_EVENTS.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewTodo;
    use crate::schema::ensure_schema;
    use crate::ErrorKind;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::sync::Mutex;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("connect sqlite::memory:");
        ensure_schema(&pool).await.expect("schema");
        pool
    }

    #[derive(Default)]
    struct RecordingSink {
        seen: Mutex<Vec<Outbound>>,
        fail: bool,
    }

    impl EventSink for RecordingSink {
        fn deliver(&self, outbound: &Outbound) -> AppResult<()> {
            if self.fail {
                return Err(AppError::new(EMIT_CODE, "closed"));
            }
            self.seen.lock().unwrap().push(outbound.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn create_answers_with_list_then_feedback() {
        let pool = memory_pool().await;
        let request = Inbound::CreateTodo(NewTodo {
            title: "A".into(),
            ..NewTodo::default()
        });
        let outbound = handle_todo_request(&pool, request).await.expect("create");
        assert_eq!(outbound.len(), 2);
        assert_eq!(outbound[0].name(), "responseTodos");
        assert_eq!(outbound[1], Outbound::FeedbackCreated);
    }

    #[tokio::test]
    async fn edit_answers_with_item_then_saved_id() {
        let pool = memory_pool().await;
        handle_todo_request(&pool, Inbound::CreateTodo(NewTodo::default()))
            .await
            .expect("create");
        let outbound = handle_todo_request(
            &pool,
            Inbound::EditDescription {
                id: 1,
                description: "notes".into(),
            },
        )
        .await
        .expect("edit");
        assert_eq!(outbound[0].name(), "responseSingleItem");
        assert_eq!(outbound[1], Outbound::FeedbackSaved(1));
    }

    #[tokio::test]
    async fn missing_item_is_not_found() {
        let pool = memory_pool().await;
        let err = handle_todo_request(&pool, Inbound::RequestSingleItem(3))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn window_requests_are_not_todo_requests() {
        let pool = memory_pool().await;
        let err = handle_todo_request(&pool, Inbound::OpenItemWindow(1))
            .await
            .unwrap_err();
        assert!(err.message().contains("openItemWindow"));
    }

    #[test]
    fn deliver_all_keeps_order_and_stops_on_failure() {
        let sink = RecordingSink::default();
        let events = [Outbound::Todos("[]".into()), Outbound::FeedbackCreated];
        deliver_all(&sink, &events).expect("deliver");
        assert_eq!(*sink.seen.lock().unwrap(), events.to_vec());

        let broken = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        let err = deliver_all(&broken, &events).unwrap_err();
        assert_eq!(err.code(), EMIT_CODE);
    }
}
