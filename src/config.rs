use std::path::{Path, PathBuf};

use anyhow::Context;

/// Bundle identifier; also names the per-user data directory.
pub const APP_IDENTIFIER: &str = "com.todo-desk.app";
pub const DB_ENV: &str = "TODO_DESK_DB";
pub const LOG_ENV: &str = "TODO_DESK_LOG";
pub const DEFAULT_LOG_FILTER: &str = "todo_desk=info,todo_desk_lib=info,sqlx=warn";
pub const DB_FILE_NAME: &str = "todo.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_filter: String,
}

impl AppConfig {
    /// Resolve from the process environment. `db_override` is the CLI `--db`.
    pub fn resolve(db_override: Option<PathBuf>) -> anyhow::Result<Self> {
        Self::resolve_with(db_override, |key| std::env::var(key).ok(), dirs::data_dir())
    }

    /// Precedence: `db_override`, then `TODO_DESK_DB`, then the data dir.
    pub fn resolve_with<F>(
        db_override: Option<PathBuf>,
        env: F,
        data_dir: Option<PathBuf>,
    ) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = env(DB_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let db_path = match db_override.or(from_env) {
            Some(path) => path,
            None => {
                let base = match data_dir {
                    Some(dir) => dir.join(APP_IDENTIFIER),
                    None => std::env::current_dir()
                        .context("no data directory and no current directory")?,
                };
                base.join(DB_FILE_NAME)
            }
        };

        let log_filter = env(LOG_ENV)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            log_dir: log_dir_for(&db_path),
            db_path,
            log_filter,
        })
    }
}

fn log_dir_for(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join("logs"),
        _ => PathBuf::from("logs"),
    }
}
