//! Local key/value persistence standing in for browser `localStorage`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Favorites and the credential cookie are persisted here so stores can load
//! and save JSON without repeating filesystem glue. Each key maps to one
//! `<key>.json` file under the storage directory; without a directory the
//! storage lives in memory only.
//!
//! TRADE-OFFS
//! ==========
//! Persistence is best-effort. Write failures are logged and the in-memory
//! copy stays authoritative for the rest of the process.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Default)]
pub struct LocalStorage {
    dir: Option<PathBuf>,
    items: Mutex<HashMap<String, String>>,
}

impl LocalStorage {
    /// Storage that never touches the filesystem.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Storage backed by `dir`. The directory is created lazily on first write.
    #[must_use]
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: Some(dir.into()), items: Mutex::new(HashMap::new()) }
    }

    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    fn key_path(&self, key: &str) -> Option<PathBuf> {
        let dir = self.dir.as_ref()?;
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        Some(dir.join(format!("{safe}.json")))
    }

    /// Raw string stored under `key`.
    pub fn get_item(&self, key: &str) -> Option<String> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(raw) = items.get(key) {
            return Some(raw.clone());
        }
        let path = self.key_path(key)?;
        let raw = std::fs::read_to_string(path).ok()?;
        items.insert(key.to_owned(), raw.clone());
        Some(raw)
    }

    /// Store a raw string under `key`.
    pub fn set_item(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        let Some(path) = self.key_path(key) else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(error = %e, key, "local storage directory unavailable");
                return;
            }
        }
        if let Err(e) = std::fs::write(&path, value) {
            tracing::warn!(error = %e, key, "local storage write failed");
        }
    }

    /// Delete `key` from memory and disk.
    pub fn remove_item(&self, key: &str) {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
        if let Some(path) = self.key_path(key) {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(error = %e, key, "local storage remove failed"),
            }
        }
    }

    /// Load a JSON value for `key`; malformed content reads as absent.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_item(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(error = %e, key, "ignoring malformed local storage value");
                None
            }
        }
    }

    /// Save a JSON value for `key`.
    pub fn save_json<T: Serialize>(&self, key: &str, value: &T) {
        let Ok(raw) = serde_json::to_string(value) else {
            return;
        };
        self.set_item(key, &raw);
    }
}
