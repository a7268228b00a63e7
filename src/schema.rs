use sqlx::{Executor, SqlitePool};
use tracing::info;

pub const TODO_ITEMS_DDL: &str = "CREATE TABLE IF NOT EXISTS todo_items (\
    id INTEGER PRIMARY KEY AUTOINCREMENT,\
    title TEXT,\
    description TEXT,\
    completed BOOLEAN,\
    dueDate TEXT\
)";

/// Create the `todo_items` table when it does not exist yet.
///
/// The schema is fixed; an existing table is used as-is and never altered.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let created: Option<i64> = sqlx::query_scalar(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'todo_items'",
    )
    .fetch_optional(pool)
    .await?;

    pool.execute(TODO_ITEMS_DDL).await?;
    info!(
        target: "todo_desk",
        event = "schema_ready",
        table = "todo_items",
        created = created.is_none()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("connect sqlite::memory:")
    }

    #[tokio::test]
    async fn creates_table_with_expected_columns() {
        let pool = memory_pool().await;
        ensure_schema(&pool).await.expect("schema");

        let columns: Vec<(String, String)> =
            sqlx::query_as("SELECT name, type FROM pragma_table_info('todo_items') ORDER BY cid")
                .fetch_all(&pool)
                .await
                .expect("table info");
        let expected = [
            ("id", "INTEGER"),
            ("title", "TEXT"),
            ("description", "TEXT"),
            ("completed", "BOOLEAN"),
            ("dueDate", "TEXT"),
        ];
        assert_eq!(columns.len(), expected.len());
        for ((name, ty), (want_name, want_ty)) in columns.iter().zip(expected) {
            assert_eq!(name, want_name);
            assert_eq!(ty, want_ty);
        }
    }

    #[tokio::test]
    async fn is_idempotent_and_keeps_rows() {
        let pool = memory_pool().await;
        ensure_schema(&pool).await.expect("first run");
        sqlx::query("INSERT INTO todo_items (title) VALUES ('kept')")
            .execute(&pool)
            .await
            .expect("insert");
        ensure_schema(&pool).await.expect("second run");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todo_items")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count, 1);
    }
}
