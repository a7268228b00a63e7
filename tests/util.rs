#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use todo_desk_lib::model::NewTodo;
use todo_desk_lib::schema::ensure_schema;

pub async fn temp_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect sqlite::memory:");
    ensure_schema(&pool).await.expect("create todo_items");
    pool
}

pub fn new_todo(title: &str) -> NewTodo {
    NewTodo {
        title: title.into(),
        ..NewTodo::default()
    }
}
