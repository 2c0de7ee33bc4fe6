//! Session service trait and its HTTP implementation
//!
//! This is the runtime-facing contract the session controller uses to talk
//! to the server. The server is the authority for identity and token
//! issuance; this layer only persists whatever token it hands out. For the
//! scriptable stub used in tests, see `infra::testing::stubs`.

use async_trait::async_trait;
use log::{info, warn};

use keystone_model::prelude::{
    AuthResponse, LoginRequest, LogoutRequest, RegisterRequest, User,
};

use crate::domains::auth::token::{SessionToken, TokenStore};
use crate::infra::api_client::ApiClient;
use crate::infra::errors::ApiResult;

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const REGISTER_ENDPOINT: &str = "/auth/register";
pub const LOGOUT_ENDPOINT: &str = "/auth/logout";
pub const CURRENT_USER_ENDPOINT: &str = "/auth/me";

/// Stateless session operations
#[async_trait]
pub trait SessionApi: Send + Sync + std::fmt::Debug {
    /// Exchange credentials for a user and token; the token is persisted
    async fn login(&self, email: &str, password: &str)
    -> ApiResult<AuthResponse>;

    /// Create an account; the returned token is persisted like `login`
    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> ApiResult<AuthResponse>;

    /// Tell the server the session ended, then always drop the local token.
    ///
    /// Server or network failures are logged and swallowed; only a failure
    /// to remove the token itself is returned.
    async fn logout(&self) -> ApiResult<()>;

    /// Fetch the account the persisted token belongs to
    async fn current_user(&self) -> ApiResult<User>;

    /// Whether a token is persisted. Says nothing about its validity.
    fn has_token(&self) -> bool;

    /// Drop the persisted token without contacting the server
    fn forget_token(&self) -> ApiResult<()>;
}

/// [`SessionApi`] backed by the HTTP API
#[derive(Debug, Clone)]
pub struct SessionService {
    api: ApiClient,
    tokens: TokenStore,
}

impl SessionService {
    pub fn new(api: ApiClient) -> Self {
        let tokens = api.tokens().clone();
        Self { api, tokens }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn persist(&self, response: &AuthResponse) -> ApiResult<()> {
        if response.token.is_empty() {
            warn!("[SessionService] Server returned an empty token, not persisting");
            return Ok(());
        }
        self.tokens.save(&SessionToken::new(response.token.as_str()))?;
        Ok(())
    }
}

#[async_trait]
impl SessionApi for SessionService {
    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> ApiResult<AuthResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse =
            self.api.post(LOGIN_ENDPOINT, &request).await?;
        self.persist(&response)?;

        info!("[SessionService] Logged in as {}", response.user.email);
        Ok(response)
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> ApiResult<AuthResponse> {
        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        let response: AuthResponse =
            self.api.post(REGISTER_ENDPOINT, &request).await?;
        self.persist(&response)?;

        info!("[SessionService] Registered {}", response.user.email);
        Ok(response)
    }

    async fn logout(&self) -> ApiResult<()> {
        let outcome = self
            .api
            .post::<serde_json::Value, _>(LOGOUT_ENDPOINT, &LogoutRequest::default())
            .await;

        self.tokens.clear()?;

        match outcome {
            Ok(_) => info!("[SessionService] Logged out"),
            Err(e) => warn!(
                "[SessionService] Logout request failed, local session cleared anyway: {}",
                e
            ),
        }
        Ok(())
    }

    async fn current_user(&self) -> ApiResult<User> {
        self.api.get(CURRENT_USER_ENDPOINT).await
    }

    fn has_token(&self) -> bool {
        self.tokens.has_token()
    }

    fn forget_token(&self) -> ApiResult<()> {
        self.tokens.clear()?;
        Ok(())
    }
}
