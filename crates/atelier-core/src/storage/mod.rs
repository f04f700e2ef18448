mod memory;
mod sqlite;

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;

use crate::config::AtelierConfig;
use crate::error::{AtelierError, Result};

/// Abstract named-record store: one durable JSON value per key.
pub trait RecordBackend: Send + Sync {
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;

    /// Replace the full value stored under `key` (write-through, no deltas).
    fn put(&self, key: &str, value: &str)
        -> impl std::future::Future<Output = Result<()>> + Send;

    fn delete(&self, key: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

impl RecordBackend for SqliteRecordStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        SqliteRecordStore::get(self, key).await
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        SqliteRecordStore::put(self, key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        SqliteRecordStore::delete(self, key).await
    }
}

impl RecordBackend for MemoryRecordStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        MemoryRecordStore::get(self, key).await
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        MemoryRecordStore::put(self, key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        MemoryRecordStore::delete(self, key).await
    }
}

/// Enum wrapper for record backends. Dispatches to the concrete
/// implementation; an enum instead of `Box<dyn RecordBackend>` because the
/// trait uses RPITIT.
pub enum Records {
    Sqlite(SqliteRecordStore),
    Memory(MemoryRecordStore),
}

impl RecordBackend for Records {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            Records::Sqlite(s) => s.get(key).await,
            Records::Memory(s) => s.get(key).await,
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Records::Sqlite(s) => s.put(key, value).await,
            Records::Memory(s) => s.put(key, value).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match self {
            Records::Sqlite(s) => s.delete(key).await,
            Records::Memory(s) => s.delete(key).await,
        }
    }
}

/// Create a record backend from the given configuration.
pub fn create_backend(config: &AtelierConfig) -> Result<Records> {
    match config.storage.backend.as_str() {
        "sqlite" => {
            let path = match &config.storage.path {
                Some(p) => std::path::PathBuf::from(p),
                None => default_sqlite_path()?,
            };
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AtelierError::Storage(format!("failed to create storage dir: {e}"))
                })?;
            }
            let store = SqliteRecordStore::open(&path)?;
            Ok(Records::Sqlite(store))
        }
        "memory" => Ok(Records::Memory(MemoryRecordStore::new())),
        other => Err(AtelierError::Config(format!(
            "unknown storage backend: {other}"
        ))),
    }
}

/// Default SQLite path: `~/.config/atelier/atelier.db`
fn default_sqlite_path() -> Result<std::path::PathBuf> {
    dirs::config_dir()
        .map(|p| p.join("atelier").join("atelier.db"))
        .ok_or_else(|| AtelierError::Config("cannot determine config directory".to_string()))
}
