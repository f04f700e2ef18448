use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension};

use crate::error::{AtelierError, Result};

/// SQLite-backed named-record store.
///
/// The on-device key-value surface the app needs is tiny (one record per
/// feature), so records live in a single `records` table. A single
/// `Connection` sits behind `Arc<Mutex<>>` so the store can be shared across
/// async tasks; all blocking SQLite calls go through
/// [`with_conn`](Self::with_conn) which runs them on the Tokio blocking
/// thread-pool.
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl SqliteRecordStore {
    /// Open (or create) a file-backed SQLite database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)
            .map_err(|e| AtelierError::Storage(format!("failed to open SQLite database: {e}")))?;

        Self::configure_and_init(conn, path)
    }

    /// Open an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            AtelierError::Storage(format!("failed to open in-memory SQLite database: {e}"))
        })?;

        Self::configure_and_init(conn, PathBuf::from(":memory:"))
    }

    /// Return the path this database was opened with (`:memory:` for in-memory).
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ── helpers ────────────────────────────────────────────────────────

    fn configure_and_init(conn: Connection, path: PathBuf) -> Result<Self> {
        // WAL mode for better concurrent-read performance.
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(|e| AtelierError::Storage(format!("failed to set WAL mode: {e}")))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };

        store.create_tables()?;
        Ok(store)
    }

    /// Create the records table (idempotent).
    fn create_tables(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| AtelierError::Storage(format!("failed to acquire database lock: {e}")))?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS records (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )
        .map_err(|e| AtelierError::Storage(format!("failed to create tables: {e}")))?;

        Ok(())
    }

    /// Run a blocking closure against the SQLite connection on the Tokio
    /// blocking thread-pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|e| {
                AtelierError::Storage(format!("failed to acquire database lock: {e}"))
            })?;
            f(&conn)
        })
        .await
        .map_err(|e| AtelierError::Storage(format!("task join error: {e}")))?
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.query_row("SELECT value FROM records WHERE key = ?1", [&key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| AtelierError::Storage(format!("failed to read record: {e}")))
        })
        .await
    }

    /// Insert or overwrite the full record for `key`.
    pub async fn put(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO records (key, value, updated_at)
                 VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                [&key, &value],
            )
            .map_err(|e| AtelierError::Storage(format!("failed to write record: {e}")))?;
            Ok(())
        })
        .await
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.execute("DELETE FROM records WHERE key = ?1", [&key])
                .map_err(|e| AtelierError::Storage(format!("failed to delete record: {e}")))?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_in_memory_creates_tables() {
        let store = SqliteRecordStore::open_in_memory().expect("should open in-memory DB");
        assert_eq!(store.path().to_str().unwrap(), ":memory:");

        let conn = store.conn.lock().unwrap();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"records".to_string()));
    }

    #[test]
    fn create_tables_is_idempotent() {
        let store = SqliteRecordStore::open_in_memory().expect("should open in-memory DB");
        store.create_tables().expect("idempotent create_tables");
    }

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        assert_eq!(store.get("savedProducts").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_then_get_roundtrip() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        store.put("savedProducts", "[]").await.unwrap();
        assert_eq!(
            store.get("savedProducts").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn put_overwrites_whole_record() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        store.put("savedProducts", "[1]").await.unwrap();
        store.put("savedProducts", "[1,2]").await.unwrap();
        assert_eq!(
            store.get("savedProducts").await.unwrap().as_deref(),
            Some("[1,2]")
        );
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        store.put("savedProducts", "[]").await.unwrap();
        store.delete("savedProducts").await.unwrap();
        assert_eq!(store.get("savedProducts").await.unwrap(), None);
    }
}
