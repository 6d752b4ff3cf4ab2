use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::storage::{KeyValueStore, StoreError, StoreOp};

pub type DbPool = SqlitePool;

/// Get the path to the database file, creating its directory if needed
pub fn get_db_path(config: &AppConfig) -> Result<PathBuf, StoreError> {
  let db_path = config.db_path();
  if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)?;
  }
  Ok(db_path)
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(db_path: &Path) -> Result<DbPool, StoreError> {
  let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

  tracing::info!("Initializing database at: {}", db_path.display());

  // Synchronous app: one writer at a time is all we need
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .connect(&db_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::debug!("Database initialized successfully");

  Ok(pool)
}

/// ---------------------------------------------------------------------------
/// SQLite Key-Value Store
/// ---------------------------------------------------------------------------

const UPSERT_SQL: &str = r#"
  INSERT INTO kv_store (key, value, updated_at)
  VALUES (?1, ?2, ?3)
  ON CONFLICT(key) DO UPDATE SET
    value = excluded.value,
    updated_at = excluded.updated_at
"#;

const DELETE_SQL: &str = "DELETE FROM kv_store WHERE key = ?1";

#[derive(Debug, Clone)]
pub struct SqliteStore {
  pool: DbPool,
}

impl SqliteStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
  async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?1")
      .bind(key)
      .fetch_optional(&self.pool)
      .await?;
    Ok(value)
  }

  async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
    sqlx::query(UPSERT_SQL)
      .bind(key)
      .bind(value)
      .bind(Utc::now().to_rfc3339())
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn delete(&self, key: &str) -> Result<(), StoreError> {
    sqlx::query(DELETE_SQL).bind(key).execute(&self.pool).await?;
    Ok(())
  }

  async fn clear_all(&self) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM kv_store").execute(&self.pool).await?;
    Ok(())
  }

  async fn write_batch(&self, ops: Vec<StoreOp>) -> Result<(), StoreError> {
    let mut tx = self.pool.begin().await?;
    let updated_at = Utc::now().to_rfc3339();

    for op in &ops {
      match op {
        StoreOp::Set { key, value } => {
          sqlx::query(UPSERT_SQL)
            .bind(key)
            .bind(value)
            .bind(&updated_at)
            .execute(&mut *tx)
            .await?;
        }
        StoreOp::Delete { key } => {
          sqlx::query(DELETE_SQL).bind(key).execute(&mut *tx).await?;
        }
      }
    }

    tx.commit().await?;
    Ok(())
  }
}
