use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;

/// Tauri managed state: the one pool every handler shares.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub db_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(pool: SqlitePool, db_path: PathBuf) -> Self {
        Self {
            pool,
            db_path: Arc::new(db_path),
        }
    }

    pub fn pool_clone(&self) -> SqlitePool {
        self.pool.clone()
    }
}
