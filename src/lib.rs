use tauri::{Manager, RunEvent};

use crate::config::AppConfig;
use crate::state::AppState;

pub mod clock;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod ipc;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod state;
pub mod util;
pub mod windows;

pub use error::{AppError, AppResult, ErrorKind};

/// Build and run the desktop app. Returns only when the event loop exits.
pub fn run(config: AppConfig) {
    error::install_panic_hook();

    let db_path = config.db_path.clone();
    let app = tauri::Builder::default()
        .setup(move |app| {
            let pool = tauri::async_runtime::block_on(db::open_sqlite_pool(&db_path))
                .inspect_err(|err| err.log_with_event("startup_failed"))?;
            app.manage(AppState::new(pool.clone(), db_path.clone()));

            let handle = app.handle().clone();
            ipc::register(&handle, pool);
            clock::spawn_ticker(handle, clock::TICK_PERIOD);
            windows::create_main_window(app.handle())?;
            Ok(())
        })
        .build(tauri::generate_context!());

    let app = match app {
        Ok(app) => app,
        Err(err) => {
            tracing::error!(target: "todo_desk", event = "startup_failed", error = %err);
            std::process::exit(1);
        }
    };

    app.run(|handle, event| {
        if let RunEvent::Exit = event {
            let Some(state) = handle.try_state::<AppState>() else {
                return;
            };
            tauri::async_runtime::block_on(state.pool_clone().close());
            tracing::info!(
                target: "todo_desk",
                event = "pool_closed",
                path = %state.db_path.display()
            );
        }
    });
}
