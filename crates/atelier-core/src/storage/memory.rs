use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{AtelierError, Result};

/// In-memory record store. Backs tests and ephemeral preview builds where
/// nothing should outlive the process.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let records = self
            .records
            .lock()
            .map_err(|e| AtelierError::Storage(format!("failed to acquire record lock: {e}")))?;
        Ok(records.get(key).cloned())
    }

    pub async fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| AtelierError::Storage(format!("failed to acquire record lock: {e}")))?;
        records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| AtelierError::Storage(format!("failed to acquire record lock: {e}")))?;
        records.remove(key);
        Ok(())
    }
}
