//! Scriptable [`SessionApi`] for controller tests
//!
//! Mirrors the persistence behaviour of the real service (a successful
//! login/register stores the token, logout always clears it) while letting
//! each test choose the server's answers and how long they take.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use keystone_model::prelude::{AuthResponse, User};

use crate::domains::auth::service::SessionApi;
use crate::domains::auth::token::{SessionToken, TokenStore};
use crate::infra::errors::{ApiError, ApiResult};
use crate::infra::storage::MemoryStore;
use crate::infra::testing::fixtures::http_error;

/// Operations recorded by [`StubSessionApi`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StubCall {
    Login,
    Register,
    Logout,
    CurrentUser,
}

#[derive(Debug, Default)]
struct Script {
    login: VecDeque<ApiResult<AuthResponse>>,
    register: VecDeque<ApiResult<AuthResponse>>,
    current_user: VecDeque<ApiResult<User>>,
    /// Returned to the caller after the token is cleared. The HTTP service
    /// swallows server failures, so script only storage errors here.
    logout: VecDeque<ApiResult<()>>,
    delays: HashMap<StubCall, VecDeque<Duration>>,
    calls: Vec<StubCall>,
}

#[derive(Debug, Clone)]
pub struct StubSessionApi {
    tokens: TokenStore,
    kv: MemoryStore,
    script: Arc<Mutex<Script>>,
}

impl Default for StubSessionApi {
    fn default() -> Self {
        Self::new()
    }
}

impl StubSessionApi {
    pub fn new() -> Self {
        let kv = MemoryStore::new();
        Self {
            tokens: TokenStore::new(Arc::new(kv.clone())),
            kv,
            script: Arc::new(Mutex::new(Script::default())),
        }
    }

    pub fn with_token(self, token: &str) -> Self {
        let _ = self.tokens.save(&SessionToken::from(token));
        self
    }

    pub fn on_login(self, result: ApiResult<AuthResponse>) -> Self {
        self.script.lock().login.push_back(result);
        self
    }

    pub fn on_register(self, result: ApiResult<AuthResponse>) -> Self {
        self.script.lock().register.push_back(result);
        self
    }

    pub fn on_current_user(self, result: ApiResult<User>) -> Self {
        self.script.lock().current_user.push_back(result);
        self
    }

    pub fn on_logout(self, result: ApiResult<()>) -> Self {
        self.script.lock().logout.push_back(result);
        self
    }

    /// Delay the next call of `op` by `delay` (queued per call)
    pub fn with_delay(self, op: StubCall, delay: Duration) -> Self {
        self.script
            .lock()
            .delays
            .entry(op)
            .or_default()
            .push_back(delay);
        self
    }

    pub fn token(&self) -> Option<String> {
        self.tokens.load().map(|t| t.as_str().to_string())
    }

    pub fn store(&self) -> &MemoryStore {
        &self.kv
    }

    pub fn calls(&self) -> Vec<StubCall> {
        self.script.lock().calls.clone()
    }

    pub fn call_count(&self, op: StubCall) -> usize {
        self.script.lock().calls.iter().filter(|c| **c == op).count()
    }

    async fn record(&self, op: StubCall) {
        let delay = {
            let mut script = self.script.lock();
            script.calls.push(op);
            script.delays.get_mut(&op).and_then(VecDeque::pop_front)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn persist(&self, result: &ApiResult<AuthResponse>) -> ApiResult<()> {
        if let Ok(response) = result {
            self.tokens.save(&SessionToken::from(response.token.as_str()))?;
        }
        Ok(())
    }
}

fn unscripted(op: &str) -> ApiError {
    ApiError::Network(format!("no scripted response for {op}"))
}

#[async_trait]
impl SessionApi for StubSessionApi {
    async fn login(
        &self,
        _email: &str,
        _password: &str,
    ) -> ApiResult<AuthResponse> {
        self.record(StubCall::Login).await;
        let result = self
            .script
            .lock()
            .login
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("login")));
        self.persist(&result)?;
        result
    }

    async fn register(
        &self,
        _email: &str,
        _password: &str,
        _name: &str,
    ) -> ApiResult<AuthResponse> {
        self.record(StubCall::Register).await;
        let result = self
            .script
            .lock()
            .register
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("register")));
        self.persist(&result)?;
        result
    }

    async fn logout(&self) -> ApiResult<()> {
        self.record(StubCall::Logout).await;
        let result = self.script.lock().logout.pop_front().unwrap_or(Ok(()));
        self.tokens.clear()?;
        result
    }

    async fn current_user(&self) -> ApiResult<User> {
        self.record(StubCall::CurrentUser).await;
        if !self.tokens.has_token() {
            return Err(http_error(401, "Not authenticated"));
        }
        self.script
            .lock()
            .current_user
            .pop_front()
            .unwrap_or_else(|| Err(http_error(401, "Invalid token")))
    }

    fn has_token(&self) -> bool {
        self.tokens.has_token()
    }

    fn forget_token(&self) -> ApiResult<()> {
        self.tokens.clear()?;
        Ok(())
    }
}
