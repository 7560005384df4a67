//! Persistence of the most recent weather snapshot.
//!
//! The snapshot lives as JSON text in a single slot of an application-scoped
//! key-value store. Saves replace the whole value; loads treat unreadable
//! text as a cache miss.

use parking_lot::Mutex;
use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::{error::WeatherError, model::WeatherSnapshot};

/// Slot holding the serialized snapshot.
pub const WEATHER_RESPONSE_KEY: &str = "weather_response_data";

/// String key-value storage that survives process restarts.
pub trait KeyValueStore: Send + Sync + Debug {
    fn get_string(&self, key: &str) -> Option<String>;
    fn put_string(&self, key: &str, value: &str) -> io::Result<()>;
}

/// In-process store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn put_string(&self, key: &str, value: &str) -> io::Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON object of string values in one file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        let Ok(text) = fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring unreadable store file");
            BTreeMap::new()
        })
    }
}

impl KeyValueStore for FileStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn put_string(&self, key: &str, value: &str) -> io::Result<()> {
        let _guard = self.write_lock.lock();

        let mut values = self.read_all();
        values.insert(key.to_string(), value.to_string());
        let text = serde_json::to_string_pretty(&values).map_err(io::Error::other)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write then rename so readers never see a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)
    }
}

/// Single-slot, last-write-wins cache of the latest snapshot.
#[derive(Debug)]
pub struct SnapshotCache {
    store: Box<dyn KeyValueStore>,
}

impl SnapshotCache {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Overwrite the slot with `snapshot`.
    pub fn save(&self, snapshot: &WeatherSnapshot) -> Result<(), WeatherError> {
        let text = snapshot.to_json()?;
        self.store.put_string(WEATHER_RESPONSE_KEY, &text)?;
        info!(location = %snapshot.location_name, observed = snapshot.timestamp, "cached weather snapshot");
        Ok(())
    }

    /// Last saved snapshot. Absent when nothing was saved or the text no
    /// longer parses.
    pub fn load(&self) -> Option<WeatherSnapshot> {
        let text = self.store.get_string(WEATHER_RESPONSE_KEY)?;
        if text.is_empty() {
            return None;
        }
        WeatherSnapshot::from_json(&text)
            .inspect_err(|e| warn!(error = %e, "cached snapshot is unreadable; treating as empty"))
            .ok()
    }
}
