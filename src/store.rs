//! Flat key-value store persisted as a single JSON document.
//!
//! Every key maps to a piece of text. Collections are stored as JSON arrays
//! inside that text while dashboard metrics keep their raw scalar value. The
//! whole namespace is rewritten on each write.

use dirs_next as dirs;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DIR: &str = "hypertrack";
const FILE: &str = "storage.json";

/// Environment variable overriding the location of the store file.
pub const STORE_ENV: &str = "HYPERTRACK_STORE";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no storage location is available")]
    Unavailable,
    #[error("I/O error accessing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result of a mutation that should have reached the backing file.
///
/// In-memory state is kept either way; `Unpersisted` only tells the caller
/// that the write failed and was logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Persisted,
    Unpersisted,
}

impl SaveOutcome {
    pub fn from_result(result: Result<(), StoreError>, what: &str) -> Self {
        match result {
            Ok(()) => SaveOutcome::Persisted,
            Err(e) => {
                log::error!("Failed to save {what}: {e}");
                SaveOutcome::Unpersisted
            }
        }
    }

    /// Combine two outcomes, keeping the failure if either failed.
    pub fn and(self, other: SaveOutcome) -> SaveOutcome {
        if self == SaveOutcome::Persisted && other == SaveOutcome::Persisted {
            SaveOutcome::Persisted
        } else {
            SaveOutcome::Unpersisted
        }
    }
}

/// Resolve the store file location.
///
/// The `HYPERTRACK_STORE` environment variable wins over the path configured
/// in the settings, which wins over `<config dir>/hypertrack/storage.json`.
pub fn resolve_path(configured: Option<&str>) -> Option<PathBuf> {
    if let Some(p) = std::env::var_os(STORE_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(p));
    }
    if let Some(p) = configured.filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(p));
    }
    dirs::config_dir().map(|p| p.join(DIR).join(FILE))
}

#[derive(Debug, Default)]
pub struct Store {
    entries: BTreeMap<String, String>,
    path: Option<PathBuf>,
}

impl Store {
    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store. A missing file is an empty store.
    ///
    /// A file that exists but does not hold a JSON object of strings is
    /// treated as empty; the next write replaces it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            log::info!("No store at {}, starting empty", path.display());
            return Ok(Self {
                entries: BTreeMap::new(),
                path: Some(path),
            });
        }
        let data = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let entries = match serde_json::from_str::<BTreeMap<String, String>>(&data) {
            Ok(map) => map,
            Err(e) => {
                log::warn!("Ignoring malformed store {}: {e}", path.display());
                BTreeMap::new()
            }
        };
        log::info!("Loaded {} keys from {}", entries.len(), path.display());
        Ok(Self {
            entries,
            path: Some(path),
        })
    }

    /// Open the store at the resolved location, falling back to an
    /// in-memory store when storage is unavailable.
    pub fn open_default(configured: Option<&str>) -> Self {
        let opened = resolve_path(configured)
            .ok_or(StoreError::Unavailable)
            .and_then(Self::open);
        match opened {
            Ok(store) => store,
            Err(e) => {
                log::warn!("Storage unavailable, changes will not be kept: {e}");
                Self::in_memory()
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_persistent(&self) -> bool {
        self.path.is_some()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.into());
        self.flush()
    }

    pub fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()
        } else {
            Ok(())
        }
    }

    /// Read a list stored under `key`.
    ///
    /// Missing keys, unparsable text and values that are not arrays all
    /// yield an empty list.
    pub fn load_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let Some(text) = self.get(key) else {
            return Vec::new();
        };
        let value = match serde_json::from_str::<Value>(text) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Failed to parse saved `{key}`: {e}");
                return Vec::new();
            }
        };
        if !value.is_array() {
            log::warn!("Saved `{key}` is not a list, ignoring it");
            return Vec::new();
        }
        serde_json::from_value(value).unwrap_or_else(|e| {
            log::warn!("Saved `{key}` has unexpected records: {e}");
            Vec::new()
        })
    }

    /// Like [`Store::load_list`] but an absent or empty list yields `default`.
    pub fn load_list_or<T: DeserializeOwned>(&self, key: &str, default: Vec<T>) -> Vec<T> {
        let items = self.load_list(key);
        if items.is_empty() { default } else { items }
    }

    pub fn save_list<T: Serialize>(&mut self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let text = serde_json::to_string(items).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.set(key, text)
    }

    /// Write the whole namespace to `path` as a JSON object.
    pub fn export_to<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        write_entries(path.as_ref(), &self.entries)
    }

    /// Replace the namespace with the contents of a previous export.
    pub fn import_from<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, StoreError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: BTreeMap<String, String> =
            serde_json::from_str(&data).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let count = entries.len();
        self.entries = entries;
        self.flush()?;
        Ok(count)
    }

    fn flush(&self) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => write_entries(path, &self.entries),
            None => Ok(()),
        }
    }
}

fn write_entries(path: &Path, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let data = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Serialize {
        key: "<store>".into(),
        source,
    })?;
    std::fs::write(path, data).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        name: String,
        reps: String,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                name: "Bench Press".into(),
                reps: "8".into(),
            },
            Row {
                name: "Dips".into(),
                reps: "12".into(),
            },
        ]
    }

    #[test]
    fn list_roundtrip_in_memory() {
        let mut store = Store::in_memory();
        store.save_list("exercises-chest", &rows()).unwrap();
        let loaded: Vec<Row> = store.load_list("exercises-chest");
        assert_eq!(loaded, rows());
    }

    #[test]
    fn list_roundtrip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");
        {
            let mut store = Store::open(&path).unwrap();
            store.save_list("exercises-chest", &rows()).unwrap();
            store.set("bodyFat", "14").unwrap();
        }
        let store = Store::open(&path).unwrap();
        assert_eq!(store.load_list::<Row>("exercises-chest"), rows());
        assert_eq!(store.get("bodyFat"), Some("14"));
    }

    #[test]
    fn missing_key_is_empty() {
        let store = Store::in_memory();
        assert!(store.load_list::<Row>("workouts-push").is_empty());
        assert_eq!(store.get("totalWorkouts"), None);
    }

    #[test]
    fn malformed_or_non_array_values_are_empty() {
        let mut store = Store::in_memory();
        store.set("a", "{not json").unwrap();
        store.set("b", r#"{"name":"Bench"}"#).unwrap();
        store.set("c", r#"[{"unexpected":true}]"#).unwrap();
        assert!(store.load_list::<Row>("a").is_empty());
        assert!(store.load_list::<Row>("b").is_empty());
        assert!(store.load_list::<Row>("c").is_empty());
    }

    #[test]
    fn load_list_or_uses_default_for_empty_array() {
        let mut store = Store::in_memory();
        store.set("personalRecords", "[]").unwrap();
        let loaded = store.load_list_or("personalRecords", rows());
        assert_eq!(loaded, rows());
    }

    #[test]
    fn malformed_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let store = Store::open(&path).unwrap();
        assert_eq!(store.keys().count(), 0);
        assert!(store.is_persistent());
    }

    #[test]
    fn failed_write_keeps_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes every write fail.
        let path = dir.path().join("blocked");
        std::fs::create_dir_all(&path).unwrap();
        let mut store = Store {
            entries: BTreeMap::new(),
            path: Some(path),
        };
        let err = store.set("bodyFat", "12");
        assert!(matches!(err, Err(StoreError::Io { .. })));
        assert_eq!(store.get("bodyFat"), Some("12"));
        let outcome = SaveOutcome::from_result(err, "body fat");
        assert_eq!(outcome, SaveOutcome::Unpersisted);
    }

    #[test]
    fn export_then_import_replaces_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let backup = dir.path().join("backup.json");
        let mut source = Store::in_memory();
        source.save_list("exercises-back", &rows()).unwrap();
        source.set("totalWorkouts", "3").unwrap();
        source.export_to(&backup).unwrap();

        let mut target = Store::in_memory();
        target.set("stale", "1").unwrap();
        let count = target.import_from(&backup).unwrap();
        assert_eq!(count, 2);
        assert_eq!(target.get("stale"), None);
        assert_eq!(target.get("totalWorkouts"), Some("3"));
        assert_eq!(target.load_list::<Row>("exercises-back"), rows());
    }

    #[test]
    fn import_rejects_malformed_backup() {
        let dir = tempfile::tempdir().unwrap();
        let backup = dir.path().join("backup.json");
        std::fs::write(&backup, "nope").unwrap();
        let mut store = Store::in_memory();
        store.set("bodyFat", "10").unwrap();
        assert!(matches!(
            store.import_from(&backup),
            Err(StoreError::Parse { .. })
        ));
        assert_eq!(store.get("bodyFat"), Some("10"));
    }

    #[test]
    fn outcome_and_keeps_failure() {
        use SaveOutcome::*;
        assert_eq!(Persisted.and(Persisted), Persisted);
        assert_eq!(Persisted.and(Unpersisted), Unpersisted);
        assert_eq!(Unpersisted.and(Persisted), Unpersisted);
    }
}
