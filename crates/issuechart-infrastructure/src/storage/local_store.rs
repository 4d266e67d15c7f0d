//! File-backed "local storage" for selections.

use std::collections::BTreeMap;
use std::path::PathBuf;

use issuechart_core::error::Result;
use issuechart_core::selection::KeyValueStore;

use crate::paths::ChartPaths;
use crate::storage::atomic_toml::AtomicTomlFile;

type Entries = BTreeMap<String, String>;

/// Flat string map persisted to `local_storage.toml`.
///
/// Each `set` is its own locked read-modify-write, so concurrent writers
/// never lose each other's keys, but nothing groups several keys into one
/// write.
pub struct FileKeyValueStore {
    file: AtomicTomlFile<Entries>,
}

impl FileKeyValueStore {
    /// Store at the default location.
    pub fn new() -> Result<Self> {
        let path = ChartPaths::default().local_storage_file()?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    /// All stored entries, sorted by key.
    pub fn entries(&self) -> Result<Entries> {
        Ok(self.file.load()?.unwrap_or_default())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.file.update(Entries::new(), |entries| {
            entries.insert(key.to_string(), value.to_string());
        })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.file.update(Entries::new(), |entries| {
            entries.remove(key);
        })?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.file.remove()?;
        tracing::debug!("[LocalStore] Cleared {}", self.file.path().display());
        Ok(())
    }
}
