//! Key-value settings store
//!
//! Settings are kept as string values holding JSON, the same shape a browser's
//! local storage would hold. The store is injected wherever settings are read
//! so tests never touch real storage.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::error::{SettingsError, SettingsResult};

/// Flat string key-value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> SettingsResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> SettingsResult<()>;
    fn remove(&self, key: &str) -> SettingsResult<()>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> SettingsResult<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SettingsResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> SettingsResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file
///
/// Every write rewrites the whole file through a sibling temp file and a
/// rename, so a crash never leaves a half-written object behind.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_object(&self) -> SettingsResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(SettingsError::Corrupt(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(SettingsError::Corrupt(format!("{}: {}", self.path.display(), e))),
        }
    }

    fn write_object(&self, map: &Map<String, Value>) -> SettingsResult<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(map).map_err(|e| SettingsError::Json {
            key: "*".to_string(),
            source: e,
        })?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), keys = map.len(), "settings file written");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> SettingsResult<Option<String>> {
        let _guard = self.lock.read().unwrap_or_else(|e| e.into_inner());
        let map = self.read_object()?;
        Ok(map.get(key).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn set(&self, key: &str, value: &str) -> SettingsResult<()> {
        let _guard = self.lock.write().unwrap_or_else(|e| e.into_inner());
        let mut map = self.read_object()?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write_object(&map)
    }

    fn remove(&self, key: &str) -> SettingsResult<()> {
        let _guard = self.lock.write().unwrap_or_else(|e| e.into_inner());
        let mut map = self.read_object()?;
        if map.remove(key).is_some() {
            self.write_object(&map)?;
        }
        Ok(())
    }
}
