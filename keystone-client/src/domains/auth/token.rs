use std::fmt;
use std::sync::Arc;

use tokio::sync::broadcast;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::infra::errors::StorageError;
use crate::infra::storage::{KeyValueStore, StorageEvent};

/// Storage key reserved for the session token
pub const TOKEN_STORAGE_KEY: &str = "auth_token";

/// Opaque bearer credential issued by the server.
///
/// The memory is zeroed on drop and the value never appears in `Debug`
/// output.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionToken {
    data: String,
}

impl SessionToken {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    /// # Security Note
    /// The returned reference points to memory that is zeroed on drop.
    /// Avoid storing it beyond the lifetime of the token.
    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.data)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("data", &"<redacted>")
            .finish()
    }
}

impl From<String> for SessionToken {
    fn from(data: String) -> Self {
        Self::new(data)
    }
}

impl From<&str> for SessionToken {
    fn from(data: &str) -> Self {
        Self::new(data)
    }
}

/// Reads and writes the single persisted session token.
///
/// Cloning is cheap; every clone talks to the same underlying store.
#[derive(Debug, Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Currently persisted token. An empty string counts as no token.
    pub fn load(&self) -> Option<SessionToken> {
        self.store
            .get(TOKEN_STORAGE_KEY)
            .filter(|raw| !raw.is_empty())
            .map(SessionToken::from)
    }

    pub fn save(&self, token: &SessionToken) -> Result<(), StorageError> {
        self.store.set(TOKEN_STORAGE_KEY, token.as_str())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(TOKEN_STORAGE_KEY)
    }

    pub fn has_token(&self) -> bool {
        self.load().is_some()
    }

    /// Changes to the token made through any handle of the same store
    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.store.subscribe()
    }

    pub fn is_token_event(event: &StorageEvent) -> bool {
        event.key == TOKEN_STORAGE_KEY
    }
}
