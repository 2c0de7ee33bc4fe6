//! Keystone client library
//!
//! Session handling for the Keystone front-end: a JSON HTTP client that
//! attaches the persisted bearer token, a stateless session service, and the
//! session state controller UI layers observe.
//!
//! Notes
//! - Construct an [`app::AppContext`] (or the pieces by hand) at the
//!   application root and pass it down; there are no global singletons.
//! - Public items are subject to change while the UI stabilizes.

pub mod app;
pub mod domains;
pub mod infra;

pub use domains::auth::{
    SessionApi, SessionController, SessionPhase, SessionService, SessionState,
};
pub use infra::api_client::{ApiClient, HttpMethod, RequestOptions};
pub use infra::config::Config;
pub use infra::errors::{ApiError, ApiResult, HttpError, RawBody};
