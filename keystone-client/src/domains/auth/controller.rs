//! Session state controller
//!
//! Owns the in-memory [`SessionState`] and drives it through the
//! [`SessionApi`]. Construct one at the application root and hand it to
//! consumers behind an `Arc`; there is no global instance.
//!
//! ## Transitions
//!
//! - Hydration runs at most once per controller. Without a persisted token it
//!   settles immediately; otherwise the token is verified against
//!   `/auth/me`, and a rejected token is dropped (forced logout).
//! - Login and register clear `error`, and on failure record it *and*
//!   return it so the caller can react as well.
//! - Logout always ends signed out, even when the server call failed.
//!
//! Overlapping operations are not serialized: whichever finishes last
//! determines the final state.

use std::sync::Arc;

use log::{info, warn};
use tokio::sync::{OnceCell, watch};

use keystone_model::User;

use crate::domains::auth::service::SessionApi;
use crate::domains::auth::state_types::{
    SessionPhase, SessionState, SessionStateStore,
};
use crate::domains::navigation::{Navigator, Route};
use crate::infra::errors::{ApiError, ApiResult};

#[derive(Debug)]
pub struct SessionController {
    service: Arc<dyn SessionApi>,
    navigator: Arc<dyn Navigator>,
    state: SessionStateStore,
    hydration: OnceCell<()>,
}

impl SessionController {
    pub fn new(
        service: Arc<dyn SessionApi>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            service,
            navigator,
            state: SessionStateStore::new(),
            hydration: OnceCell::new(),
        }
    }

    /// Create the controller and run hydration before returning it
    pub async fn start(
        service: Arc<dyn SessionApi>,
        navigator: Arc<dyn Navigator>,
    ) -> Arc<Self> {
        let controller = Arc::new(Self::new(service, navigator));
        controller.hydrate().await;
        controller
    }

    /// Rebuild the session from the persisted token.
    ///
    /// Only the first call does any work; concurrent and later callers wait
    /// for that first run to finish.
    pub async fn hydrate(&self) {
        self.hydration
            .get_or_init(|| self.run_hydration())
            .await;
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydration.initialized()
    }

    async fn run_hydration(&self) {
        if !self.service.has_token() {
            info!("[SessionController] No persisted token, starting signed out");
            self.state.signed_out();
            return;
        }

        match self.service.current_user().await {
            Ok(user) => {
                info!("[SessionController] Restored session for {}", user.email);
                self.state.authenticated(user);
            }
            Err(e) => {
                warn!(
                    "[SessionController] Persisted token rejected, signing out: {}",
                    e
                );
                if let Err(e) = self.service.forget_token() {
                    log::error!(
                        "[SessionController] Failed to drop rejected token: {}",
                        e
                    );
                }
                self.state.signed_out();
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        self.state.begin(true);
        let result = self.service.login(email, password).await;
        self.finish_sign_in(result.map(|r| r.user), "Failed to login")
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> ApiResult<User> {
        self.state.begin(true);
        let result = self.service.register(email, password, name).await;
        self.finish_sign_in(result.map(|r| r.user), "Failed to register")
    }

    fn finish_sign_in(
        &self,
        result: ApiResult<User>,
        fallback: &str,
    ) -> ApiResult<User> {
        match result {
            Ok(user) => {
                self.state.authenticated(user.clone());
                self.navigator.navigate(Route::Dashboard);
                Ok(user)
            }
            Err(e) => {
                self.state.failed(error_message(&e, fallback));
                Err(e)
            }
        }
    }

    /// Sign out locally, whatever the server says
    pub async fn logout(&self) {
        self.state.begin(false);

        let error = match self.service.logout().await {
            Ok(()) => None,
            Err(e) => {
                warn!("[SessionController] Logout failed: {}", e);
                Some(error_message(&e, "Failed to logout"))
            }
        };

        self.state.update(|state| {
            state.user = None;
            state.is_loading = false;
            if error.is_some() {
                state.error = error;
            }
        });
        self.navigator.navigate(Route::Login);
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    pub fn state(&self) -> SessionState {
        self.state.current()
    }

    pub fn user(&self) -> Option<User> {
        self.state.with_state(|s| s.user.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.state.with_state(|s| s.is_loading)
    }

    pub fn error(&self) -> Option<String> {
        self.state.with_state(|s| s.error.clone())
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.with_state(SessionState::phase)
    }

    /// Fast local check: a token is persisted
    pub fn has_token(&self) -> bool {
        self.service.has_token()
    }

    /// The server confirmed the session and a user snapshot is held
    pub fn is_verified(&self) -> bool {
        self.state.with_state(SessionState::is_verified)
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}

fn error_message(err: &ApiError, fallback: &str) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
