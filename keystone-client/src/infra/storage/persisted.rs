use std::fmt;
use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use super::{KeyValueStore, StorageEvent};
use crate::infra::errors::StorageError;

/// A JSON-encoded value bound to one storage key.
///
/// Missing or unreadable entries fall back to the initial value, so a
/// corrupted preference never prevents the application from starting.
pub struct PersistedValue<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    initial: T,
}

impl<T: fmt::Debug> fmt::Debug for PersistedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedValue")
            .field("key", &self.key)
            .field("initial", &self.initial)
            .finish()
    }
}

impl<T> PersistedValue<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        initial: T,
    ) -> Self {
        Self {
            store,
            key: key.into(),
            initial,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> T {
        match self.store.get(&self.key) {
            Some(raw) => self.decode(&raw),
            None => self.initial.clone(),
        }
    }

    pub fn set(&self, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(&self.key, &raw)
    }

    /// Read-modify-write; returns the stored value
    pub fn update<F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(T) -> T,
    {
        let next = f(self.get());
        self.set(&next)?;
        Ok(next)
    }

    pub fn reset(&self) -> Result<(), StorageError> {
        self.store.remove(&self.key)
    }

    /// Decode a change notification for this key. Events for other keys
    /// yield `None`; a removal yields the initial value.
    pub fn value_from_event(&self, event: &StorageEvent) -> Option<T> {
        if event.key != self.key {
            return None;
        }
        Some(match &event.new_value {
            Some(raw) => self.decode(raw),
            None => self.initial.clone(),
        })
    }

    fn decode(&self, raw: &str) -> T {
        serde_json::from_str(raw).unwrap_or_else(|e| {
            log::error!(
                "[PersistedValue] Unreadable value under '{}': {}",
                self.key,
                e
            );
            self.initial.clone()
        })
    }
}
