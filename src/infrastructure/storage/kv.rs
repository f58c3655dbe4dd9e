//! File-backed key-value store.
//!
//! Holds the handful of values that must survive across runs: the
//! IP-locale flag and the Bing session record. One JSON object per file,
//! no schema versioning.

use crate::domain::error::FyError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

pub struct KvStore {
    path: Option<PathBuf>,
    entries: Mutex<Map<String, Value>>,
}

impl KvStore {
    /// Open the store at the default location, loading existing entries.
    /// A missing or unreadable file starts empty.
    pub fn open_default() -> Self {
        let path = dirs::config_dir().map(|p| p.join("fy").join("state.json"));
        let entries = path
            .as_deref()
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_json::from_str::<Map<String, Value>>(&content).ok())
            .unwrap_or_default();
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Purely in-memory store, used in tests.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(Map::new()),
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), FyError> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), serde_json::to_value(value)?);
        self.flush(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<(), FyError> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
        self.flush(&entries)
    }

    fn flush(&self, entries: &Map<String, Value>) -> Result<(), FyError> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, serde_json::to_string_pretty(entries)?)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let store = KvStore::in_memory();
        store.set("flag", &true).unwrap();
        assert_eq!(store.get::<bool>("flag"), Some(true));
    }

    #[test]
    fn missing_key_yields_none() {
        let store = KvStore::in_memory();
        assert_eq!(store.get::<bool>("absent"), None);
    }

    #[test]
    fn remove_clears_entry() {
        let store = KvStore::in_memory();
        store.set("n", &42u32).unwrap();
        store.remove("n").unwrap();
        assert_eq!(store.get::<u32>("n"), None);
    }
}
