//! Error types for the HTTP and persistence layers
//!
//! Every fallible operation at the session-service boundary returns
//! [`ApiError`], so callers match on a tagged result instead of relying on
//! panics or stringly-typed failures.

use std::fmt;

use thiserror::Error;

/// Generic message used when the server does not supply one
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Main error type returned by the API client and session service
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never completed (connection refused, DNS, TLS, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status, or with a body that could
    /// not be parsed as expected
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Reading or writing the persisted token failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The request could not be built (unserializable body, bad header)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The client could not be constructed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status code, when the failure came from a server response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http(err) => Some(err.status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn as_http(&self) -> Option<&HttpError> {
        match self {
            ApiError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

/// A classified server failure
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct HttpError {
    pub status: u16,
    pub message: String,
    pub raw_body: RawBody,
}

impl HttpError {
    pub fn new(
        status: u16,
        message: impl Into<String>,
        raw_body: RawBody,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            raw_body,
        }
    }
}

/// Response body attached to an [`HttpError`]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Text(String),
}

impl RawBody {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            RawBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawBody::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for RawBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawBody::Empty => Ok(()),
            RawBody::Json(value) => write!(f, "{value}"),
            RawBody::Text(text) => f.write_str(text),
        }
    }
}

/// Key-value persistence errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Failed to access storage file: {0}")]
    Io(String),

    #[error("Failed to serialize storage contents: {0}")]
    Serialize(String),

    #[error("Storage location unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialize(err.to_string())
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
