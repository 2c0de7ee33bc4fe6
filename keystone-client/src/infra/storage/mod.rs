//! Synchronous key-value persistence
//!
//! The session layer only needs a tiny string store with change
//! notification. [`MemoryStore`] backs tests and ephemeral sessions;
//! [`FileStore`] keeps values across restarts of the embedding application.

mod file;
mod memory;
mod persisted;

pub use file::{FileStore, STORAGE_FILE};
pub use memory::MemoryStore;
pub use persisted::PersistedValue;

use std::fmt;

use tokio::sync::broadcast;

use crate::infra::errors::StorageError;

/// Buffered change events per store before slow subscribers start lagging
pub(crate) const EVENT_CAPACITY: usize = 64;

/// Change notification emitted after a successful mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    /// `None` when the key was removed
    pub new_value: Option<String>,
}

/// String key-value store shared by every handle of the same origin
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Receive a [`StorageEvent`] for every change made through any handle
    /// sharing this store
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}
