//! Authentication domain
//!
//! Layered from the bottom up:
//! - [`token`]: the persisted session token
//! - [`service`]: stateless HTTP operations behind [`service::SessionApi`]
//! - [`state_types`]: the observable session state
//! - [`controller`]: the state machine consumers interact with

pub mod controller;
pub mod service;
pub mod state_types;
pub mod token;

pub use controller::SessionController;
pub use service::{SessionApi, SessionService};
pub use state_types::{SessionPhase, SessionState, SessionStateStore};
pub use token::{SessionToken, TOKEN_STORAGE_KEY, TokenStore};
