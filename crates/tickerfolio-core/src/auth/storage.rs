//! Durable key/value storage for the session credential pair.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::warn;

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "authToken";

/// Storage key for the user identifier
pub const USER_ID_KEY: &str = "userId";

/// Synchronous string storage the session writes through to.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// JSON object on disk, rewritten in full on every mutation.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current entries. A file that does not parse counts as empty, so the
    /// session starts logged out and the next write replaces it.
    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read session file")?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        match serde_json::from_str(&contents) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable session file");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if entries.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path).context("Failed to remove session file")?;
            }
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write then rename so a crash never leaves a half-written file behind
        let tmp = self.path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&tmp, contents).context("Failed to write session file")?;
        std::fs::rename(&tmp, &self.path).context("Failed to replace session file")?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Process-local storage, for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory storage lock poisoned"))
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

impl<S: SessionStorage + ?Sized> SessionStorage for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("session.json"));

        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);

        storage.set(TOKEN_KEY, "abc").unwrap();
        storage.set(USER_ID_KEY, "7").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        assert_eq!(storage.get(USER_ID_KEY).unwrap().as_deref(), Some("7"));

        storage.remove(TOKEN_KEY).unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert!(storage.path().exists());

        // Removing the last key removes the file
        storage.remove(USER_ID_KEY).unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        FileStorage::new(&path).set(TOKEN_KEY, "persisted").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_file_storage_treats_corrupt_file_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::new(&path);
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);

        // The next write replaces the damaged file
        storage.set(TOKEN_KEY, "x").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("x"));
        let on_disk: BTreeMap<String, String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 1);
    }

    #[test]
    fn test_file_storage_remove_on_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(FileStorage::new(&path).remove(USER_ID_KEY).is_ok());
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.set(USER_ID_KEY, "1").unwrap();
        assert_eq!(storage.get(USER_ID_KEY).unwrap().as_deref(), Some("1"));
        storage.remove(USER_ID_KEY).unwrap();
        assert_eq!(storage.get(USER_ID_KEY).unwrap(), None);
    }
}
