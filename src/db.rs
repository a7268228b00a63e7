use std::path::Path;

use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{ConnectOptions, Pool, Sqlite, SqlitePool};
use tracing::{info, warn};

use crate::schema;
use crate::{AppError, AppResult};

/// Open (creating when absent) the todo database at `db_path` and make sure
/// the schema exists.
pub async fn open_sqlite_pool(db_path: &Path) -> AppResult<Pool<Sqlite>> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|err| {
            tracing::error!(
                target: "todo_desk",
                event = "db_dir_create_failed",
                error = %err,
                path = %parent.display()
            );
            AppError::from(err).with_context("path", parent.display().to_string())
        })?;
    }
    info!(target: "todo_desk", event = "db_path", path = %db_path.display());

    let opts = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Full)
        .busy_timeout(std::time::Duration::from_millis(5000))
        .log_statements(log::LevelFilter::Off);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(opts)
        .await
        .map_err(|err| {
            AppError::new(
                AppError::DB_OPEN_CODE,
                format!("cannot open database {}", db_path.display()),
            )
            .with_context("path", db_path.display().to_string())
            .with_cause(AppError::from(err))
        })?;

    log_effective_pragmas(&pool).await;

    schema::ensure_schema(&pool).await.map_err(|err| {
        AppError::from(err)
            .with_context("operation", "ensure_schema")
            .with_context("path", db_path.display().to_string())
    })?;

    Ok(pool)
}

async fn log_effective_pragmas(pool: &Pool<Sqlite>) {
    let (sqlite_ver,): (String,) = sqlx::query_as("select sqlite_version()")
        .fetch_one(pool)
        .await
        .unwrap_or((String::from("unknown"),));

    let jm: (String,) = sqlx::query_as("PRAGMA journal_mode;")
        .fetch_one(pool)
        .await
        .unwrap_or((String::from("unknown"),));

    let sync: (i64,) = sqlx::query_as("PRAGMA synchronous;")
        .fetch_one(pool)
        .await
        .unwrap_or((i64::MIN,));

    let busy: (i64,) = sqlx::query_as("PRAGMA busy_timeout;")
        .fetch_one(pool)
        .await
        .unwrap_or((i64::MIN,));

    info!(
        target: "todo_desk",
        event = "db_open",
        sqlite_version = %sqlite_ver,
        journal_mode = %jm.0,
        synchronous = %sync.0,
        busy_timeout_ms = %busy.0
    );

    if !jm.0.eq_ignore_ascii_case("wal") {
        warn!(
            target: "todo_desk",
            event = "db_open_warning",
            msg = "journal_mode != WAL; running with reduced crash safety"
        );
    }
}

/// Snapshot printed by `todo-desk db status`.
#[derive(Debug, Clone, Serialize)]
pub struct DbStatus {
    pub path: String,
    pub sqlite_version: String,
    pub journal_mode: String,
    pub quick_check: String,
    pub todo_count: i64,
}

impl DbStatus {
    pub fn is_ok(&self) -> bool {
        self.quick_check.eq_ignore_ascii_case("ok")
    }
}

pub async fn status(pool: &SqlitePool, db_path: &Path) -> AppResult<DbStatus> {
    let with_op = |err: sqlx::Error| AppError::from(err).with_context("operation", "db_status");

    let sqlite_version: String = sqlx::query_scalar("select sqlite_version()")
        .fetch_one(pool)
        .await
        .map_err(with_op)?;
    let journal_mode: String = sqlx::query_scalar("PRAGMA journal_mode;")
        .fetch_one(pool)
        .await
        .map_err(with_op)?;
    // quick_check yields one row per problem, or a single "ok".
    let problems: Vec<String> = sqlx::query_scalar("PRAGMA quick_check;")
        .fetch_all(pool)
        .await
        .map_err(with_op)?;
    let todo_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todo_items")
        .fetch_one(pool)
        .await
        .map_err(with_op)?;

    Ok(DbStatus {
        path: db_path.display().to_string(),
        sqlite_version,
        journal_mode,
        quick_check: problems.join("; "),
        todo_count,
    })
}

pub async fn vacuum(pool: &SqlitePool) -> AppResult<()> {
    sqlx::query("VACUUM;")
        .execute(pool)
        .await
        .map_err(|err| AppError::from(err).with_context("operation", "vacuum"))?;
    info!(target: "todo_desk", event = "db_vacuum");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn opens_fresh_database_in_nested_dir() {
        let tmp = tempdir().expect("tempdir");
        let db_path = tmp.path().join("nested").join("todo.db");

        let pool = open_sqlite_pool(&db_path).await.expect("open pool");
        assert!(db_path.exists());

        let report = status(&pool, &db_path).await.expect("status");
        assert!(report.is_ok(), "quick_check: {}", report.quick_check);
        assert_eq!(report.todo_count, 0);
        assert!(report.journal_mode.eq_ignore_ascii_case("wal"));
        pool.close().await;
    }

    #[tokio::test]
    async fn open_failure_keeps_the_sqlite_error_as_cause() {
        let tmp = tempdir().expect("tempdir");
        // A directory cannot be opened as a database file.
        let err = open_sqlite_pool(tmp.path()).await.unwrap_err();
        assert_eq!(err.code(), AppError::DB_OPEN_CODE);
        let cause = err.cause().expect("sqlx cause");
        assert_eq!(cause.kind(), crate::ErrorKind::Query, "{cause}");

        let rendered = format!("{:#}", anyhow::Error::new(err.clone()));
        assert!(rendered.contains(cause.message()), "{rendered}");
    }

    #[tokio::test]
    async fn vacuum_succeeds_on_fresh_database() {
        let tmp = tempdir().expect("tempdir");
        let db_path = tmp.path().join("todo.db");
        let pool = open_sqlite_pool(&db_path).await.expect("open pool");
        vacuum(&pool).await.expect("vacuum");
        pool.close().await;
    }
}
