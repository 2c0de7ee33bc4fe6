//! Session state and its observable store
//!
//! The state is a plain tuple mirrored into a `watch` channel, so readers
//! never take a lock and UI layers can await changes.

use std::sync::Arc;

use keystone_model::User;
use tokio::sync::watch;

/// In-memory session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    /// `true` while a login/register/logout/hydration is in flight; the
    /// rest of the state is not authoritative until it clears
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for SessionState {
    /// Hydration has not finished yet
    fn default() -> Self {
        Self {
            user: None,
            is_loading: true,
            error: None,
        }
    }
}

/// What a consumer should render for a given [`SessionState`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// State not yet authoritative
    Loading,
    /// A user snapshot obtained from the server is held
    Authenticated(User),
    /// Settled with no user and no pending error
    Unauthenticated,
    /// Settled with no user after a failure
    Failed(String),
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        if self.is_loading {
            return SessionPhase::Loading;
        }
        match (&self.user, &self.error) {
            (Some(user), _) => SessionPhase::Authenticated(user.clone()),
            (None, Some(error)) => SessionPhase::Failed(error.clone()),
            (None, None) => SessionPhase::Unauthenticated,
        }
    }

    /// Verified by a server round trip, as opposed to merely holding a token
    pub fn is_verified(&self) -> bool {
        self.user.is_some()
    }
}

/// Thread-safe session state store using a watch channel
#[derive(Clone, Debug)]
pub struct SessionStateStore {
    sender: Arc<watch::Sender<SessionState>>,
}

impl Default for SessionStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStateStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(SessionState::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn current(&self) -> SessionState {
        self.sender.borrow().clone()
    }

    /// Access state without cloning
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SessionState) -> R,
    {
        f(&self.sender.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.sender.subscribe()
    }

    /// Apply a mutation; subscribers are woken only when the state changed
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut SessionState),
    {
        self.sender.send_if_modified(|state| {
            let before = state.clone();
            f(state);
            *state != before
        });
    }

    pub fn begin(&self, clear_error: bool) {
        self.update(|state| {
            state.is_loading = true;
            if clear_error {
                state.error = None;
            }
        });
    }

    pub fn authenticated(&self, user: User) {
        self.update(|state| {
            state.user = Some(user);
            state.is_loading = false;
        });
    }

    pub fn signed_out(&self) {
        self.update(|state| {
            state.user = None;
            state.is_loading = false;
        });
    }

    pub fn failed(&self, message: String) {
        self.update(|state| {
            state.error = Some(message);
            state.is_loading = false;
        });
    }

    pub fn clear_error(&self) {
        self.update(|state| state.error = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use keystone_model::{Role, UserId};

    fn user() -> User {
        User {
            id: UserId::new("1"),
            email: "a@b.com".into(),
            name: "A".into(),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn phases_are_distinct() {
        let store = SessionStateStore::new();
        assert_eq!(store.current().phase(), SessionPhase::Loading);

        store.signed_out();
        assert_eq!(store.current().phase(), SessionPhase::Unauthenticated);

        store.begin(true);
        store.failed("Invalid credentials".into());
        assert_eq!(
            store.current().phase(),
            SessionPhase::Failed("Invalid credentials".into())
        );

        store.begin(true);
        store.authenticated(user());
        assert!(matches!(
            store.current().phase(),
            SessionPhase::Authenticated(u) if u.id == "1"
        ));
        assert!(store.with_state(SessionState::is_verified));
    }

    #[tokio::test]
    async fn subscribers_see_changes_only() {
        let store = SessionStateStore::new();
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        store.clear_error();
        assert!(!rx.has_changed().unwrap());

        store.signed_out();
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().is_loading);
    }
}
