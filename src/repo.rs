//! Statements against the `todo_items` table.
//!
//! Reads coalesce NULL columns so rows written by other tools still decode.

use sqlx::SqlitePool;

use crate::model::{NewTodo, TodoItem};

const ITEM_COLUMNS: &str = "id, \
    COALESCE(title, '') AS title, \
    COALESCE(description, '') AS description, \
    COALESCE(completed, 0) AS completed, \
    COALESCE(dueDate, '') AS dueDate";

pub async fn list_items(pool: &SqlitePool) -> Result<Vec<TodoItem>, sqlx::Error> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM todo_items ORDER BY id");
    sqlx::query_as::<_, TodoItem>(&sql).fetch_all(pool).await
}

pub async fn get_item(pool: &SqlitePool, id: i64) -> Result<Option<TodoItem>, sqlx::Error> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM todo_items WHERE id = ?");
    sqlx::query_as::<_, TodoItem>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Insert a row and return the id storage assigned to it.
pub async fn insert_item(pool: &SqlitePool, new: &NewTodo) -> Result<i64, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO todo_items (title, description, completed, dueDate) VALUES (?, ?, ?, ?)",
    )
    .bind(&new.title)
    .bind(&new.description)
    .bind(new.completed)
    .bind(&new.due_date)
    .execute(pool)
    .await?;
    Ok(res.last_insert_rowid())
}

/// Flip `completed` in place. Returns false when no row has `id`.
pub async fn toggle_completed(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let res = sqlx::query(
        "UPDATE todo_items SET completed = NOT COALESCE(completed, 0) WHERE id = ?",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() > 0)
}

/// Replace `description` and return the updated row, or `None` when no row has `id`.
pub async fn update_description(
    pool: &SqlitePool,
    id: i64,
    description: &str,
) -> Result<Option<TodoItem>, sqlx::Error> {
    let sql = format!("UPDATE todo_items SET description = ? WHERE id = ? RETURNING {ITEM_COLUMNS}");
    // Step the statement to completion so the write is finished before returning.
    let rows = sqlx::query_as::<_, TodoItem>(&sql)
        .bind(description)
        .bind(id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().next())
}

/// Delete by id. Returns the number of removed rows (0 for an unknown id).
pub async fn delete_item(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM todo_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
