//! Key-value persistence contract and the in-memory backend.
//!
//! The progress store only ever needs string keys and string (JSON) values.
//! [`crate::db::SqliteStore`] is the durable implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Serialization error: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error("Failed to prepare data directory: {0}")]
  Io(#[from] std::io::Error),

  #[error("Storage unavailable: {0}")]
  Unavailable(String),
}

/// One write in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
  Set { key: String, value: String },
  Delete { key: String },
}

/// ---------------------------------------------------------------------------
/// Store Contract
/// ---------------------------------------------------------------------------

#[async_trait]
pub trait KeyValueStore: Send + Sync {
  async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

  async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

  async fn delete(&self, key: &str) -> Result<(), StoreError>;

  async fn clear_all(&self) -> Result<(), StoreError>;

  /// Apply writes in order. Backends with transactions override this so the
  /// batch lands all-or-nothing.
  async fn write_batch(&self, ops: Vec<StoreOp>) -> Result<(), StoreError> {
    for op in ops {
      match op {
        StoreOp::Set { key, value } => self.set(&key, &value).await?,
        StoreOp::Delete { key } => self.delete(&key).await?,
      }
    }
    Ok(())
  }
}

/// Volatile store for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
  entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
  async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    Ok(self.entries.lock().await.get(key).cloned())
  }

  async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
    self.entries.lock().await.insert(key.to_string(), value.to_string());
    Ok(())
  }

  async fn delete(&self, key: &str) -> Result<(), StoreError> {
    self.entries.lock().await.remove(key);
    Ok(())
  }

  async fn clear_all(&self) -> Result<(), StoreError> {
    self.entries.lock().await.clear();
    Ok(())
  }

  async fn write_batch(&self, ops: Vec<StoreOp>) -> Result<(), StoreError> {
    let mut entries = self.entries.lock().await;
    for op in ops {
      match op {
        StoreOp::Set { key, value } => {
          entries.insert(key, value);
        }
        StoreOp::Delete { key } => {
          entries.remove(&key);
        }
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_memory_store_get_set_delete() {
    let store = MemoryStore::new();
    assert_eq!(store.get("a").await.unwrap(), None);

    store.set("a", "1").await.unwrap();
    store.set("a", "2").await.unwrap();
    assert_eq!(store.get("a").await.unwrap(), Some("2".to_string()));

    store.delete("a").await.unwrap();
    assert_eq!(store.get("a").await.unwrap(), None);

    // Deleting a missing key is not an error
    store.delete("a").await.unwrap();
  }

  #[tokio::test]
  async fn test_memory_store_batch_and_clear() {
    let store = MemoryStore::new();
    store.set("stale", "x").await.unwrap();

    store
      .write_batch(vec![
        StoreOp::Set { key: "a".into(), value: "1".into() },
        StoreOp::Delete { key: "stale".into() },
      ])
      .await
      .unwrap();

    assert_eq!(store.get("a").await.unwrap(), Some("1".to_string()));
    assert_eq!(store.get("stale").await.unwrap(), None);

    store.clear_all().await.unwrap();
    assert_eq!(store.get("a").await.unwrap(), None);
  }
}
