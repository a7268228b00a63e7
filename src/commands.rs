use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::{
    model::{NewTodo, TodoItem},
    repo, AppError, AppResult,
};

fn query_error(err: sqlx::Error, operation: &str) -> AppError {
    AppError::from(err).with_context("operation", operation.to_string())
}

fn query_error_for(err: sqlx::Error, operation: &str, id: i64) -> AppError {
    query_error(err, operation).with_context("id", id.to_string())
}

/// Every todo in insertion order.
pub async fn list_todos(pool: &SqlitePool) -> AppResult<Vec<TodoItem>> {
    let items = repo::list_items(pool)
        .await
        .map_err(|err| query_error(err, "list"))?;
    debug!(target: "todo_desk", event = "todos_listed", count = items.len());
    Ok(items)
}

pub async fn get_todo(pool: &SqlitePool, id: i64) -> AppResult<TodoItem> {
    repo::get_item(pool, id)
        .await
        .map_err(|err| query_error_for(err, "get", id))?
        .ok_or_else(|| AppError::not_found(id).with_context("operation", "get"))
}

/// Insert `new` and answer with the whole list, not the created row.
pub async fn create_todo(pool: &SqlitePool, new: NewTodo) -> AppResult<Vec<TodoItem>> {
    let id = repo::insert_item(pool, &new)
        .await
        .map_err(|err| query_error(err, "create"))?;
    info!(target: "todo_desk", event = "todo_created", id);
    list_todos(pool).await
}

pub async fn toggle_todo(pool: &SqlitePool, id: i64) -> AppResult<Vec<TodoItem>> {
    let found = repo::toggle_completed(pool, id)
        .await
        .map_err(|err| query_error_for(err, "toggle", id))?;
    if !found {
        return Err(AppError::not_found(id).with_context("operation", "toggle"));
    }
    info!(target: "todo_desk", event = "todo_toggled", id);
    list_todos(pool).await
}

/// Remove `id` if present. An unknown id is not an error.
pub async fn delete_todo(pool: &SqlitePool, id: i64) -> AppResult<Vec<TodoItem>> {
    let removed = repo::delete_item(pool, id)
        .await
        .map_err(|err| query_error_for(err, "delete", id))?;
    info!(target: "todo_desk", event = "todo_deleted", id, removed);
    list_todos(pool).await
}

/// Replace the description of `id` and answer with that single item.
pub async fn edit_description(
    pool: &SqlitePool,
    id: i64,
    description: &str,
) -> AppResult<TodoItem> {
    let item = repo::update_description(pool, id, description)
        .await
        .map_err(|err| query_error_for(err, "edit_description", id))?
        .ok_or_else(|| AppError::not_found(id).with_context("operation", "edit_description"))?;
    info!(
        target: "todo_desk",
        event = "todo_description_edited",
        id,
        description_len = description.len()
    );
    Ok(item)
}
