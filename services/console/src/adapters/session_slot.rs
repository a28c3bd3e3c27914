//! services/console/src/adapters/session_slot.rs
//!
//! Implementations of the `SessionSlot` port: a directory of JSON files for
//! sessions that survive a restart, and a process-local map for tests and
//! throwaway runs.

use async_trait::async_trait;
use recordkeep_core::ports::{PortError, PortResult, SessionSlot};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

//=========================================================================================
// File-backed Slot
//=========================================================================================

/// Stores each key as `<dir>/<key>.json`.
#[derive(Clone, Debug)]
pub struct FileSessionSlot {
    dir: PathBuf,
}

impl FileSessionSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PortResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PortError::Unexpected(format!(
                "Invalid session slot key '{}'",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl SessionSlot for FileSessionSlot {
    async fn read(&self, key: &str) -> PortResult<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }

    async fn write(&self, key: &str, blob: &str) -> PortResult<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Staged write, then rename over the target.
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, blob)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!(path = %path.display(), "Session slot written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }
}

//=========================================================================================
// In-memory Slot
//=========================================================================================

/// Keeps slots in a process-local map. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySessionSlot {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> PortResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| PortError::Unexpected("session slot lock poisoned".to_string()))
    }
}

#[async_trait]
impl SessionSlot for MemorySessionSlot {
    async fn read(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn write(&self, key: &str, blob: &str) -> PortResult<()> {
        self.lock()?.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
