//! File-backed key-value storage
//!
//! Entries live in a single JSON object on disk. Every mutation rewrites the
//! file through a temporary sibling and a rename, so a crash mid-write never
//! leaves a truncated store behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use directories::ProjectDirs;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use super::{EVENT_CAPACITY, KeyValueStore, StorageEvent};
use crate::infra::errors::StorageError;

pub const STORAGE_FILE: &str = "storage.json";

/// Persistent store; clones share the same file, cache and event channel
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: Arc<Mutex<BTreeMap<String, String>>>,
    events: broadcast::Sender<StorageEvent>,
}

impl FileStore {
    /// Open the store in the platform data directory
    pub fn open_default() -> Result<Self, StorageError> {
        let proj_dirs = ProjectDirs::from("", "keystone", "keystone")
            .ok_or_else(|| {
                StorageError::Unavailable(
                    "Unable to determine data directory".to_string(),
                )
            })?;
        Self::open(proj_dirs.data_dir().join(STORAGE_FILE))
    }

    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = Self::load(&path)?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        log::debug!(
            "[FileStore] Opened {} with {} entries",
            path.display(),
            entries.len()
        );

        Ok(Self {
            path,
            entries: Arc::new(Mutex::new(entries)),
            events,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                log::error!(
                    "[FileStore] Ignoring corrupted storage file {}: {}",
                    path.display(),
                    e
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn persist(
        &self,
        entries: &BTreeMap<String, String>,
    ) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&tmp_path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&tmp_path, perms)?;
        }

        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Apply `mutate` to a copy of the entries, write it out, then commit it
    /// to the cache. Returns whether anything changed.
    fn update<F>(&self, mutate: F) -> Result<bool, StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        if !mutate(&mut next) {
            return Ok(false);
        }
        self.persist(&next)?;
        *entries = next;
        Ok(true)
    }

    fn notify(&self, key: &str, new_value: Option<String>) {
        // Ignore send errors (no subscribers)
        let _ = self.events.send(StorageEvent {
            key: key.to_string(),
            new_value,
        });
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let changed = self.update(|entries| {
            entries.insert(key.to_string(), value.to_string()).as_deref()
                != Some(value)
        })?;
        if changed {
            self.notify(key, Some(value.to_string()));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let changed = self.update(|entries| entries.remove(key).is_some())?;
        if changed {
            self.notify(key, None);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }
}
