//! Thin JSON HTTP client
//!
//! Joins endpoints onto the configured base URL, attaches the persisted
//! bearer token, and turns every non-2xx response into an [`HttpError`].
//! The client only ever *reads* the token; persisting and clearing it is
//! the session service's job.

use std::fmt;

use log::{debug, info, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::{Serialize, de::DeserializeOwned};

use crate::domains::auth::token::TokenStore;
use crate::infra::config::Config;
use crate::infra::errors::{
    ApiError, ApiResult, GENERIC_ERROR_MESSAGE, HttpError, RawBody,
};

/// HTTP verbs accepted by [`ApiClient::request`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&reqwest::Method::from(*self), f)
    }
}

/// Per-request options
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: HttpMethod,
    /// Extra headers, applied on top of `Content-Type: application/json`
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Send and accept cookies for this request (default `true`)
    pub with_credentials: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            headers: Vec::new(),
            body: None,
            with_credentials: true,
        }
    }
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        self.body = Some(serde_json::to_value(body).map_err(|e| {
            ApiError::InvalidRequest(format!("body is not JSON: {e}"))
        })?);
        Ok(self)
    }

    pub fn with_credentials(mut self, enabled: bool) -> Self {
        self.with_credentials = enabled;
        self
    }
}

/// API client with bearer-token support
#[derive(Clone)]
pub struct ApiClient {
    /// Shares a cookie jar across requests
    client: Client,
    /// Never sends or stores cookies
    anonymous: Client,
    base_url: String,
    tokens: TokenStore,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.tokens.has_token())
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>, tokens: TokenStore) -> ApiResult<Self> {
        let base_url = normalize_base_url(base_url.into());

        let build = |cookies: bool| {
            Client::builder()
                .cookie_store(cookies)
                .build()
                .map_err(|e| {
                    ApiError::Config(format!("Failed to create HTTP client: {e}"))
                })
        };
        let client = build(true)?;
        let anonymous = build(false)?;

        info!("[ApiClient] Creating new API client with base URL: {}", base_url);

        Ok(Self {
            client,
            anonymous,
            base_url,
            tokens,
        })
    }

    /// Build a client for `config.api_url`, normalized before validation
    pub fn from_config(config: &Config, tokens: TokenStore) -> ApiResult<Self> {
        let base_url = normalize_base_url(config.api_url.clone());
        Config::validate_url(&base_url)?;
        Self::new(base_url, tokens)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Join an endpoint path onto the base URL. Absolute URLs pass through.
    pub fn build_url(&self, endpoint: impl AsRef<str>) -> String {
        let endpoint = endpoint.as_ref();
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn build_headers(&self, options: &RequestOptions) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ApiError::InvalidRequest(format!("header name '{name}': {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ApiError::InvalidRequest(format!("header value for '{name}': {e}"))
            })?;
            headers.insert(name, value);
        }

        if let Some(token) = self.tokens.load() {
            let mut value = HeaderValue::from_str(&token.bearer()).map_err(|_| {
                ApiError::InvalidRequest(
                    "stored token is not a valid header value".to_string(),
                )
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    async fn send(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult<(StatusCode, RawBody)> {
        let url = self.build_url(endpoint);
        let headers = self.build_headers(&options)?;
        let client = if options.with_credentials {
            &self.client
        } else {
            &self.anonymous
        };

        debug!("[ApiClient] {} {}", options.method, url);

        let mut request = client
            .request(options.method.into(), &url)
            .headers(headers);
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("[ApiClient] {} {} failed: {}", options.method, url, e);
            ApiError::from(e)
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let text = response.text().await?;

        let body = parse_body(status, content_type.as_deref(), text)?;
        if !status.is_success() {
            let message = error_message(&body);
            warn!(
                "[ApiClient] {} {} returned {}: {}",
                options.method, url, status, message
            );
            return Err(HttpError::new(status.as_u16(), message, body).into());
        }

        Ok((status, body))
    }

    /// Issue a request and return the undecoded body
    pub async fn request_raw(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult<RawBody> {
        self.send(endpoint, options).await.map(|(_, body)| body)
    }

    /// Issue a request and decode the body into `T`.
    ///
    /// Non-JSON bodies decode as a JSON string, so `T = String` receives the
    /// raw text. Empty bodies decode as `null`, so `T = ()` accepts 204s.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let (status, body) = self.send(endpoint, options).await?;
        decode_body(status, body)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.request(endpoint, RequestOptions::new(HttpMethod::Get))
            .await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let options = RequestOptions::new(HttpMethod::Post).json(body)?;
        self.request(endpoint, options).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let options = RequestOptions::new(HttpMethod::Put).json(body)?;
        self.request(endpoint, options).await
    }

    pub async fn patch<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let options = RequestOptions::new(HttpMethod::Patch).json(body)?;
        self.request(endpoint, options).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> ApiResult<T> {
        self.request(endpoint, RequestOptions::new(HttpMethod::Delete))
            .await
    }
}

// Many users will provide "localhost:8000/api", which reqwest rejects.
fn normalize_base_url(raw: String) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    // Only scheme-less input gets a default; other schemes fail validation.
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };
    if with_scheme != raw {
        warn!(
            "[ApiClient] Normalized base URL from '{}' to '{}'",
            raw, with_scheme
        );
    }
    with_scheme
}

/// Classify a response body by its declared content type.
///
/// Only a bodiless reply (no bytes and no declared type, or an empty JSON
/// body) is [`RawBody::Empty`]; an empty `text/*` body stays text.
fn parse_body(
    status: StatusCode,
    content_type: Option<&str>,
    text: String,
) -> ApiResult<RawBody> {
    let is_json =
        content_type.is_some_and(|ct| ct.contains("application/json"));
    if text.is_empty() && (is_json || content_type.is_none()) {
        return Ok(RawBody::Empty);
    }
    if !is_json {
        return Ok(RawBody::Text(text));
    }
    match serde_json::from_str(&text) {
        Ok(value) => Ok(RawBody::Json(value)),
        Err(e) => Err(HttpError::new(
            status.as_u16(),
            format!("Malformed JSON response: {e}"),
            RawBody::Text(text),
        )
        .into()),
    }
}

/// `message`, then FastAPI's `detail`, then the generic fallback
fn error_message(body: &RawBody) -> String {
    body.as_json()
        .and_then(|value| {
            ["message", "detail"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        })
        .filter(|message| !message.is_empty())
        .unwrap_or(GENERIC_ERROR_MESSAGE)
        .to_string()
}

fn decode_body<T: DeserializeOwned>(
    status: StatusCode,
    body: RawBody,
) -> ApiResult<T> {
    let value = match &body {
        RawBody::Empty => serde_json::Value::Null,
        RawBody::Json(value) => value.clone(),
        RawBody::Text(text) => serde_json::Value::String(text.clone()),
    };
    serde_json::from_value(value).map_err(|e| {
        HttpError::new(
            status.as_u16(),
            format!("Unexpected response body: {e}"),
            body,
        )
        .into()
    })
}
