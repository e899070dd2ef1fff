//! String key-value storage backing the history store.
//!
//! Reads are infallible from the caller's point of view: a slot that is
//! missing or cannot be read is simply absent. Writes report failure so the
//! caller can decide whether to care.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::KanjuError;

/// A persistent get/set-string service.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), KanjuError>;
}

/// In-process store, mainly for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail, like a full or locked backing store.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KanjuError> {
        if self.read_only {
            return Err(KanjuError::Storage(format!("store is read-only: {key}")));
        }
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key (`<dir>/<key>.json`).
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.slot_path(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read storage slot");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KanjuError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.slot_path(key), value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").is_none());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_memory_read_only_rejects_writes() {
        let mut store = MemoryStore::new();
        store.set("k", "v").unwrap();
        store.set_read_only(true);
        assert!(store.set("k", "w").is_err());
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_file_missing_slot_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.get("videoHistory").is_none());
    }

    #[test]
    fn test_file_creates_directory_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("data").join("kanju"));
        store.set("videoHistory", "[]").unwrap();

        assert!(store.dir().join("videoHistory.json").exists());
        assert_eq!(store.get("videoHistory").as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_write_failure_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("occupied");
        std::fs::write(&blocker, "not a directory").unwrap();

        let mut store = FileStore::new(&blocker);
        assert!(store.set("videoHistory", "[]").is_err());
    }
}
